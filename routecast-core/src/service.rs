//! High-level service facade that turns a route into a forecast dataset.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::dataset::AggregatedDataset;
use crate::model::{
    Coordinates, DailyForecast, DayCount, LocationKey, ProviderMeta, Route, SkipReason,
    SkippedPoint, TimeOfDay,
};
use crate::plugin::ProviderPlugin;
use crate::projection::{ProjectionError, project};

/// Public entry point for resolving route points and building forecast tables.
///
/// Every provider failure is logged and downgraded to an absent result; none of the
/// methods here return errors.
pub struct RouteForecastService {
    plugin: Arc<ProviderPlugin>,
}

impl RouteForecastService {
    /// Create a new service bound to the provided plugin.
    #[must_use]
    pub fn new(plugin: Arc<ProviderPlugin>) -> Self {
        Self { plugin }
    }

    /// Metadata of the provider in use.
    #[must_use]
    pub fn provider(&self) -> &ProviderMeta {
        &self.plugin.meta
    }

    /// Resolve a place name to a location key, `None` if the provider cannot.
    pub async fn resolve_location(&self, name: &str) -> Option<LocationKey> {
        match self.plugin.location_port.resolve(name).await {
            Ok(key) => {
                debug!(%name, %key, "resolved location");
                Some(key)
            }
            Err(err) => {
                warn!(%name, error = %err, "location lookup failed");
                None
            }
        }
    }

    /// Coordinates of a resolved location, `None` on any failure.
    pub async fn lookup_coordinates(&self, key: &LocationKey) -> Option<Coordinates> {
        match self.plugin.location_port.coordinates(key).await {
            Ok(coordinates) => Some(coordinates),
            Err(err) => {
                warn!(%key, error = %err, "coordinate lookup failed");
                None
            }
        }
    }

    /// Daily forecast for a resolved location, `None` on any failure.
    pub async fn fetch_forecast(&self, key: &LocationKey) -> Option<Vec<DailyForecast>> {
        match self.plugin.forecast_port.daily_forecast(key).await {
            Ok(forecasts) => {
                debug!(%key, days = forecasts.len(), "fetched forecast");
                Some(forecasts)
            }
            Err(err) => {
                warn!(%key, error = %err, "forecast request failed");
                None
            }
        }
    }

    /// Build the forecast table for every distinct point of the route, dated from today.
    pub async fn aggregate(
        &self,
        route: &Route,
        days: DayCount,
        time_of_day: TimeOfDay,
    ) -> AggregatedDataset {
        let today = Local::now().date_naive();
        self.aggregate_from(route, days, time_of_day, today).await
    }

    /// Same as [`Self::aggregate`] with an explicit date for the first forecast day.
    ///
    /// Points are processed one after another. A point that fails to resolve or to
    /// return a forecast contributes no rows and is listed in
    /// [`AggregatedDataset::skipped`].
    pub async fn aggregate_from(
        &self,
        route: &Route,
        days: DayCount,
        time_of_day: TimeOfDay,
        today: NaiveDate,
    ) -> AggregatedDataset {
        let mut dataset = AggregatedDataset::default();

        for name in route.distinct_points() {
            let Some(key) = self.resolve_location(name).await else {
                dataset.skipped.push(skipped(name, SkipReason::Unresolved));
                continue;
            };

            let coordinates = self.lookup_coordinates(&key).await;

            let forecasts = self.fetch_forecast(&key).await.unwrap_or_default();
            if forecasts.is_empty() {
                dataset.skipped.push(skipped(name, SkipReason::NoForecast));
                continue;
            }

            let rows = match project(&forecasts, days, time_of_day, today, name, coordinates) {
                Ok(rows) => rows,
                Err(ProjectionError::DayCountOutOfRange {
                    requested,
                    available,
                }) => {
                    warn!(%name, requested, available, "forecast shorter than requested");
                    dataset.skipped.push(skipped(
                        name,
                        SkipReason::Truncated {
                            requested,
                            available,
                        },
                    ));
                    days.clamp_to(available)
                        .and_then(|fitting| {
                            project(&forecasts, fitting, time_of_day, today, name, coordinates)
                                .ok()
                        })
                        .unwrap_or_default()
                }
            };

            dataset.rows.extend(rows);
        }

        info!(
            rows = dataset.rows.len(),
            skipped = dataset.skipped.len(),
            provider = %self.plugin.meta.name,
            "forecast refresh finished"
        );

        dataset
    }
}

fn skipped(name: &str, reason: SkipReason) -> SkippedPoint {
    SkippedPoint {
        name: name.to_owned(),
        reason,
    }
}
