use std::mem;
use std::sync::Arc;

use routecast_core::{
    dataset::AggregatedDataset,
    model::{DayCount, Metric, Route, TimeOfDay},
    service::RouteForecastService,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    Start,
    End,
    Intermediate,
}

impl Field {
    pub(crate) fn next(self) -> Self {
        match self {
            Field::Start => Field::End,
            Field::End => Field::Intermediate,
            Field::Intermediate => Field::Start,
        }
    }

    pub(crate) fn previous(self) -> Self {
        match self {
            Field::Start => Field::Intermediate,
            Field::End => Field::Start,
            Field::Intermediate => Field::End,
        }
    }
}

/// Dashboard selections, taken from the config at startup.
#[derive(Debug, Clone, Default)]
pub(crate) struct Selections {
    pub days: DayCount,
    pub time_of_day: TimeOfDay,
    pub metric: Metric,
    pub route: Route,
}

pub(crate) struct App {
    pub service: Arc<RouteForecastService>,

    pub focus: Field,
    pub start_input: String,
    pub end_input: String,
    pub intermediate_input: String,
    /// Only the intermediates are authoritative; start/end come from the inputs.
    pub route: Route,

    pub days: DayCount,
    pub time_of_day: TimeOfDay,
    pub metric: Metric,

    pub dataset: AggregatedDataset,
    /// Selections the current dataset was fetched with.
    pub fetched: Option<(DayCount, TimeOfDay)>,

    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(service: Arc<RouteForecastService>, selections: Selections) -> Self {
        let Selections {
            days,
            time_of_day,
            metric,
            route,
        } = selections;

        Self {
            service,
            focus: Field::Start,
            start_input: route.start.clone().unwrap_or_default(),
            end_input: route.end.clone().unwrap_or_default(),
            intermediate_input: String::new(),
            route: Route {
                start: None,
                end: None,
                intermediates: route.intermediates,
            },
            days,
            time_of_day,
            metric,
            dataset: AggregatedDataset::default(),
            fetched: None,
            is_loading: false,
            error_message: None,
        }
    }

    pub(crate) fn focused_input_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Start => &mut self.start_input,
            Field::End => &mut self.end_input,
            Field::Intermediate => &mut self.intermediate_input,
        }
    }

    /// Move the intermediate input into the route; returns false for a blank input.
    pub(crate) fn add_intermediate(&mut self) -> bool {
        if self.intermediate_input.trim().is_empty() {
            return false;
        }
        let name = mem::take(&mut self.intermediate_input);
        self.route = mem::take(&mut self.route).with_intermediate(name);
        true
    }

    pub(crate) fn remove_last_intermediate(&mut self) {
        if let Some(last) = self.route.intermediates.len().checked_sub(1) {
            self.route = mem::take(&mut self.route).without_intermediate(last);
        }
    }

    /// The route as it would be queried right now.
    pub(crate) fn current_route(&self) -> Route {
        Route::new(
            Some(self.start_input.as_str()),
            Some(self.end_input.as_str()),
            self.route.intermediates.clone(),
        )
    }

    pub(crate) fn apply_dataset(&mut self, dataset: AggregatedDataset) {
        self.fetched = Some((self.days, self.time_of_day));
        self.error_message = if dataset.skipped.is_empty() {
            None
        } else {
            let notices = dataset
                .skipped
                .iter()
                .map(|skip| format!("{} ({})", skip.name, skip.reason))
                .collect::<Vec<_>>()
                .join(", ");
            Some(format!("Skipped: {notices}"))
        };
        self.dataset = dataset;
    }
}
