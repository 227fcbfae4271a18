use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{
        Axis, Block, Borders, Cell, Chart, Dataset, GraphType, List, ListItem, Paragraph, Row,
        Table, Wrap,
        canvas::{Canvas, Line as CanvasLine, Map, MapResolution, Points},
    },
};
use chrono::NaiveDate;
use routecast_core::model::{Coordinates, DayCount, MAX_FORECAST_DAYS, Metric, TimeOfDay};

use crate::app::{App, Field};

const SERIES_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Green,
    Color::LightRed,
    Color::LightBlue,
];

/// Map centre when no point has coordinates (Moscow).
const DEFAULT_CENTER: Coordinates = Coordinates {
    latitude: 55.7558,
    longitude: 37.6173,
};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, inputs, route + settings, chart + map, details, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(12),
            Constraint::Length(8),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, inputs_area, route_area, plots_area, details_area, status_area] = chunks
    else {
        return;
    };

    let header = Paragraph::new(format!(
        "routecast – weather along your route · {}",
        app.service.provider().name
    ))
    .block(Block::default().borders(Borders::ALL).title("Routecast"));
    frame.render_widget(header, *header_area);

    draw_inputs(frame, app, *inputs_area);
    draw_route(frame, app, *route_area);
    draw_plots(frame, app, *plots_area);
    draw_details(frame, app, *details_area);

    let nav_hint = "Tab move · Enter add stop/refresh · Del drop stop · ←/→ days · \
                    Ctrl-T day/night · Ctrl-P metric · F5 refresh · Esc quit";

    let status_text = if app.is_loading {
        format!("Loading… · {nav_hint}")
    } else if let Some(msg) = &app.error_message {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_inputs(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let fields = [
        (Field::Start, "Start (e.g. Москва)", app.start_input.as_str()),
        (Field::End, "End (e.g. Санкт-Петербург)", app.end_input.as_str()),
        (
            Field::Intermediate,
            "Stop (e.g. Омск, Enter adds)",
            app.intermediate_input.as_str(),
        ),
    ];

    for ((field, title, value), field_area) in fields.into_iter().zip(layout_chunks.iter()) {
        let border_style = if app.focus == field {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let input = Paragraph::new(value).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        );
        frame.render_widget(input, *field_area);
    }
}

fn draw_route(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [points_area, settings_area] = chunks else {
        return;
    };

    let route = app.current_route();
    let points = route.points().collect::<Vec<_>>();
    let items = if points.is_empty() {
        vec![ListItem::new("No route points yet. Fill in start and end.")]
    } else {
        vec![ListItem::new(points.join(" → "))]
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Route ({} stops)", route.intermediates.len())),
    );
    frame.render_widget(list, *points_area);

    let settings = vec![
        Line::from(format!("Days:   {}", day_slider(app.days))),
        Line::from(format!("Period: {}", app.time_of_day)),
        Line::from(format!("Chart:  {}", app.metric.label())),
    ];
    let paragraph = Paragraph::new(settings)
        .block(Block::default().borders(Borders::ALL).title("Forecast"));
    frame.render_widget(paragraph, *settings_area);
}

fn draw_plots(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [chart_area, map_area] = chunks else {
        return;
    };

    draw_chart(frame, app, *chart_area);
    draw_map(frame, app, *map_area);
}

fn draw_chart(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let title = chart_title(app.metric, app.fetched, app.time_of_day);

    let (Some((first_date, last_date)), Some(value_bounds)) = (
        app.dataset.date_span(),
        app.dataset.value_bounds(app.metric),
    ) else {
        let paragraph = Paragraph::new("No forecast data. Add route points and press F5.")
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    };

    let series = app.dataset.series(app.metric);
    let series_points = series
        .iter()
        .map(|line| {
            line.points
                .iter()
                .map(|(date, value)| (day_offset(*date, first_date), *value))
                .collect::<Vec<(f64, f64)>>()
        })
        .collect::<Vec<_>>();

    let datasets = series
        .iter()
        .zip(&series_points)
        .zip(SERIES_COLORS.iter().cycle())
        .map(|((line, points), color)| {
            Dataset::default()
                .name(line.location.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(*color))
                .data(points)
        })
        .collect::<Vec<_>>();

    let span = day_offset(last_date, first_date).max(1.0);
    let (low, high) = padded(value_bounds, app.metric);

    let x_axis = Axis::default()
        .title("Date")
        .bounds([0.0, span])
        .labels(vec![
            first_date.format("%d.%m").to_string(),
            last_date.format("%d.%m").to_string(),
        ]);
    let y_axis = Axis::default()
        .title(app.metric.label())
        .bounds([low, high])
        .labels(vec![format!("{low:.0}"), format!("{high:.0}")]);

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(title))
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, area);
}

fn draw_map(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let markers = app.dataset.markers();
    let (x_bounds, y_bounds) = map_bounds(&markers);

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title("Map"))
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::High,
                color: Color::DarkGray,
            });
            ctx.layer();

            for pair in markers.windows(2) {
                if let [(_, from), (_, to)] = pair {
                    ctx.draw(&CanvasLine {
                        x1: from.longitude,
                        y1: from.latitude,
                        x2: to.longitude,
                        y2: to.latitude,
                        color: Color::Blue,
                    });
                }
            }
            ctx.layer();

            for (name, coordinates) in &markers {
                ctx.draw(&Points {
                    coords: &[(coordinates.longitude, coordinates.latitude)],
                    color: Color::Red,
                });
                ctx.print(
                    coordinates.longitude,
                    coordinates.latitude,
                    Span::styled((*name).to_owned(), Style::default().fg(Color::White)),
                );
            }
        });

    frame.render_widget(canvas, area);
}

fn draw_details(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let title = "Details";

    if app.dataset.is_empty() {
        let paragraph = Paragraph::new("Nothing to show yet.")
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);
        return;
    }

    let rows = app.dataset.rows.iter().map(|row| {
        let coordinates = row
            .coordinates
            .map_or_else(|| String::from("–"), |coordinates| coordinates.to_string());

        Row::new(vec![
            Cell::from(row.date.format("%Y-%m-%d").to_string()),
            Cell::from(row.location.clone()),
            Cell::from(format!("{:.1}°C", row.temperature)),
            Cell::from(format!("{:.0}%", row.humidity)),
            Cell::from(format!("{:.1} km/h", row.wind_speed)),
            Cell::from(format!("{:.0}%", row.precipitation_probability)),
            Cell::from(coordinates),
            Cell::from(row.description.clone()),
        ])
    });

    let column_widths = [
        Constraint::Length(10),
        Constraint::Length(16),
        Constraint::Length(8),
        Constraint::Length(6),
        Constraint::Length(11),
        Constraint::Length(7),
        Constraint::Length(20),
        Constraint::Min(20),
    ];

    let table = Table::new(rows, column_widths)
        .header(
            Row::new(vec![
                "Date", "Place", "Temp", "Humid", "Wind", "Precip", "Coordinates", "Outlook",
            ])
            .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(1);

    frame.render_widget(table, area);
}

/// Describes the plotted data by the selections it was fetched with.
fn chart_title(
    metric: Metric,
    fetched: Option<(DayCount, TimeOfDay)>,
    current: TimeOfDay,
) -> String {
    match fetched {
        Some((days, time_of_day)) => {
            format!("Forecast: {} ({time_of_day}, {days} d)", metric.label())
        }
        None => format!("Forecast: {} ({current})", metric.label()),
    }
}

fn day_slider(days: DayCount) -> String {
    let filled = days.get();
    let empty = usize::from(MAX_FORECAST_DAYS).saturating_sub(filled);
    format!("{}{} {days}", "■".repeat(filled), "□".repeat(empty))
}

#[expect(clippy::cast_precision_loss, reason = "forecast spans a few days")]
fn day_offset(date: NaiveDate, first: NaiveDate) -> f64 {
    (date - first).num_days() as f64
}

/// Widen flat series and leave headroom above the highest point.
fn padded((low, high): (f64, f64), metric: Metric) -> (f64, f64) {
    let margin = ((high - low) * 0.1).max(1.0);
    let low = low - margin;
    let high = high + margin;
    match metric {
        Metric::Humidity | Metric::PrecipitationProbability => (low.max(0.0), high.min(100.0)),
        Metric::Temperature | Metric::WindSpeed => (low, high),
    }
}

/// Longitude/latitude window around the markers, or around Moscow without any.
pub(crate) fn map_bounds(markers: &[(&str, Coordinates)]) -> ([f64; 2], [f64; 2]) {
    const PADDING: f64 = 5.0;

    let (mut west, mut east, mut south, mut north) = if markers.is_empty() {
        (
            DEFAULT_CENTER.longitude - 15.0,
            DEFAULT_CENTER.longitude + 15.0,
            DEFAULT_CENTER.latitude - 8.0,
            DEFAULT_CENTER.latitude + 8.0,
        )
    } else {
        markers.iter().fold(
            (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
            |(west, east, south, north), (_, coordinates)| {
                (
                    west.min(coordinates.longitude - PADDING),
                    east.max(coordinates.longitude + PADDING),
                    south.min(coordinates.latitude - PADDING),
                    north.max(coordinates.latitude + PADDING),
                )
            },
        )
    };

    west = west.max(-180.0);
    east = east.min(180.0);
    south = south.max(-90.0);
    north = north.min(90.0);

    ([west, east], [south, north])
}
