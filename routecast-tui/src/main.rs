//! Terminal dashboard for routecast that charts and maps weather forecasts along a route.

mod app;
mod config;
mod input;
mod logging;
mod ui;

use std::{io, sync::Arc, time::Duration as StdDuration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use routecast_core::{model::Route, service::RouteForecastService};
use routecast_provider_accuweather as accuweather;
use tracing::{info, warn};

use crate::app::{App, Selections};
use crate::config::Config;
use crate::input::Action;

// Route points are fetched sequentially.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::load()?;
    let log_file = logging::init(&config.logging)?;
    info!(log_file = %log_file.display(), config = %Config::config_path().display(), "starting routecast");

    let warnings = config.warnings();
    for warning in &warnings {
        warn!("{warning}");
    }

    // HTTP + service setup
    let client = Client::builder()
        .user_agent("routecast/0.1")
        .timeout(StdDuration::from_secs(config.provider.timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;

    let plugin = accuweather::plugin(client, config.provider.settings());
    let service = Arc::new(RouteForecastService::new(Arc::new(plugin)));

    // App state
    let selections = Selections {
        days: config.defaults.days,
        time_of_day: config.defaults.time_of_day()?,
        metric: config.defaults.metric,
        route: Route::new(
            config.defaults.start.clone(),
            config.defaults.end.clone(),
            config.defaults.intermediates.clone(),
        ),
    };
    let mut app = App::new(service, selections);
    app.error_message = warnings.into_iter().next();

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match input::handle_key_event(key, &mut app) {
                Action::Quit => break,
                Action::None => {}
                Action::Refresh => {
                    let route = app.current_route();
                    if route.points().next().is_none() {
                        app.error_message = Some("Enter at least a start or end point".into());
                        continue;
                    }

                    app.is_loading = true;
                    app.error_message = None;
                    terminal.draw(|frame| ui::draw(frame, &app))?;

                    info!(
                        points = route.distinct_points().len(),
                        days = %app.days,
                        period = %app.time_of_day,
                        "refreshing forecast"
                    );
                    let dataset = app
                        .service
                        .aggregate(&route, app.days, app.time_of_day)
                        .await;

                    app.is_loading = false;
                    app.apply_dataset(dataset);
                }
            }
        }
    }

    Ok(())
}
