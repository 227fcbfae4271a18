//! Projection of raw daily forecasts into chartable rows.

use chrono::{Days, NaiveDate};

use crate::model::{Coordinates, DailyForecast, DayCount, ForecastRow, TimeOfDay};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Errors raised while projecting a forecast.
pub enum ProjectionError {
    /// More days were requested than the forecast contains.
    #[error("Requested {requested} forecast days but only {available} are available")]
    DayCountOutOfRange {
        /// Days asked for.
        requested: usize,
        /// Days present in the forecast.
        available: usize,
    },
}

/// Project the first `days` forecast days for the given half of the day.
///
/// Each row takes the provider's date when present and `today + offset` otherwise.
/// An empty forecast yields no rows regardless of `days`.
///
/// # Errors
///
/// Returns [`ProjectionError::DayCountOutOfRange`] when `forecasts` is non-empty but
/// shorter than `days`.
pub fn project(
    forecasts: &[DailyForecast],
    days: DayCount,
    time_of_day: TimeOfDay,
    today: NaiveDate,
    location: &str,
    coordinates: Option<Coordinates>,
) -> Result<Vec<ForecastRow>, ProjectionError> {
    if forecasts.is_empty() {
        return Ok(Vec::new());
    }

    let requested = days.get();
    let Some(selected) = forecasts.get(..requested) else {
        return Err(ProjectionError::DayCountOutOfRange {
            requested,
            available: forecasts.len(),
        });
    };

    let rows = selected
        .iter()
        .zip(0_u64..)
        .map(|(forecast, offset)| {
            let period = forecast.period(time_of_day);
            ForecastRow {
                date: forecast
                    .date
                    .or_else(|| today.checked_add_days(Days::new(offset)))
                    .unwrap_or(today),
                location: location.to_owned(),
                coordinates,
                temperature: period.temperature,
                humidity: period.humidity,
                wind_speed: period.wind_speed,
                precipitation_probability: period.precipitation_probability,
                description: period.description.clone(),
            }
        })
        .collect();

    Ok(rows)
}
