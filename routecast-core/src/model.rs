//! Domain data structures for routes, resolved locations, and forecasts.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Longest forecast horizon the providers deliver, in days.
pub const MAX_FORECAST_DAYS: u8 = 5;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// A user-facing selection that is outside of the accepted values.
pub enum InvalidSelection {
    /// Day count outside of `1..=MAX_FORECAST_DAYS`.
    #[error("Day count must be between 1 and {MAX_FORECAST_DAYS}, got {0}")]
    DayCount(u8),
    /// Unknown time-of-day literal.
    #[error("Unknown time of day: {0}")]
    TimeOfDay(String),
    /// Unknown chart metric.
    #[error("Unknown metric: {0}")]
    Metric(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a weather provider known to routecast.
pub struct ProviderId(pub String);

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Metadata describing a provider and its human-friendly name.
pub struct ProviderMeta {
    /// Unique identifier.
    pub id: ProviderId,
    /// Display name.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Opaque provider-assigned identifier for a resolved place name.
pub struct LocationKey(pub String);

impl fmt::Display for LocationKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Geographic position of a resolved location.
pub struct Coordinates {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl fmt::Display for Coordinates {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
/// Which half of a forecast day to read.
pub enum TimeOfDay {
    /// Daytime period.
    #[default]
    Day,
    /// Nighttime period.
    Night,
}

impl TimeOfDay {
    /// Localized label shown in the dashboard.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TimeOfDay::Day => "День",
            TimeOfDay::Night => "Ночь",
        }
    }

    /// The other period.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            TimeOfDay::Day => TimeOfDay::Night,
            TimeOfDay::Night => TimeOfDay::Day,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.label())
    }
}

impl FromStr for TimeOfDay {
    type Err = InvalidSelection;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed == "День" || trimmed.eq_ignore_ascii_case("day") {
            Ok(TimeOfDay::Day)
        } else if trimmed == "Ночь" || trimmed.eq_ignore_ascii_case("night") {
            Ok(TimeOfDay::Night)
        } else {
            Err(InvalidSelection::TimeOfDay(raw.to_owned()))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
/// Number of forecast days to project, always within `1..=MAX_FORECAST_DAYS`.
pub struct DayCount(u8);

impl DayCount {
    /// Build a day count, rejecting values outside the forecast horizon.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSelection::DayCount`] for 0 or values above [`MAX_FORECAST_DAYS`].
    pub fn new(days: u8) -> Result<Self, InvalidSelection> {
        if (1..=MAX_FORECAST_DAYS).contains(&days) {
            Ok(Self(days))
        } else {
            Err(InvalidSelection::DayCount(days))
        }
    }

    /// Number of days as an index bound.
    #[must_use]
    pub fn get(self) -> usize {
        usize::from(self.0)
    }

    /// One more day, saturating at the horizon.
    #[must_use]
    pub fn increment(self) -> Self {
        Self(self.0.saturating_add(1).min(MAX_FORECAST_DAYS))
    }

    /// One less day, saturating at one.
    #[must_use]
    pub fn decrement(self) -> Self {
        Self(self.0.saturating_sub(1).max(1))
    }

    /// Largest day count that fits into `available` days, if any.
    #[must_use]
    pub fn clamp_to(self, available: usize) -> Option<Self> {
        let available = u8::try_from(available).unwrap_or(u8::MAX);
        Self::new(self.0.min(available)).ok()
    }
}

impl Default for DayCount {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for DayCount {
    type Error = InvalidSelection;

    fn try_from(days: u8) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl From<DayCount> for u8 {
    fn from(days: DayCount) -> Self {
        days.0
    }
}

impl fmt::Display for DayCount {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Forecast value plotted on the chart.
pub enum Metric {
    /// Wet-bulb globe temperature average in °C.
    #[default]
    Temperature,
    /// Average relative humidity in %.
    Humidity,
    /// Wind speed in km/h.
    WindSpeed,
    /// Precipitation probability in %.
    PrecipitationProbability,
}

impl Metric {
    /// Axis label including the unit.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature (°C)",
            Metric::Humidity => "Humidity (%)",
            Metric::WindSpeed => "Wind speed (km/h)",
            Metric::PrecipitationProbability => "Precipitation (%)",
        }
    }

    /// Next metric in selector order, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Metric::Temperature => Metric::Humidity,
            Metric::Humidity => Metric::WindSpeed,
            Metric::WindSpeed => Metric::PrecipitationProbability,
            Metric::PrecipitationProbability => Metric::Temperature,
        }
    }

    /// Read this metric from a forecast row.
    #[must_use]
    pub fn value(self, row: &ForecastRow) -> f64 {
        match self {
            Metric::Temperature => row.temperature,
            Metric::Humidity => row.humidity,
            Metric::WindSpeed => row.wind_speed,
            Metric::PrecipitationProbability => row.precipitation_probability,
        }
    }
}

impl FromStr for Metric {
    type Err = InvalidSelection;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "temperature" => Ok(Metric::Temperature),
            "humidity" => Ok(Metric::Humidity),
            "wind_speed" | "wind" => Ok(Metric::WindSpeed),
            "precipitation_probability" | "precipitation" => {
                Ok(Metric::PrecipitationProbability)
            }
            _ => Err(InvalidSelection::Metric(raw.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Weather values for one half of a forecast day.
pub struct PeriodForecast {
    /// Wet-bulb globe temperature average in °C.
    pub temperature: f64,
    /// Average relative humidity in %.
    pub humidity: f64,
    /// Wind speed in km/h.
    pub wind_speed: f64,
    /// Precipitation probability in %.
    pub precipitation_probability: f64,
    /// Provider phrase describing the period.
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One provider forecast day with its day and night periods.
pub struct DailyForecast {
    /// Calendar date reported by the provider, if it sent one.
    pub date: Option<NaiveDate>,
    /// Daytime values.
    pub day: PeriodForecast,
    /// Nighttime values.
    pub night: PeriodForecast,
}

impl DailyForecast {
    /// Values for the requested half of the day.
    #[must_use]
    pub fn period(&self, time_of_day: TimeOfDay) -> &PeriodForecast {
        match time_of_day {
            TimeOfDay::Day => &self.day,
            TimeOfDay::Night => &self.night,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Normalized forecast record ready for charting.
pub struct ForecastRow {
    /// Calendar date of the forecast.
    pub date: NaiveDate,
    /// Route point the row belongs to.
    pub location: String,
    /// Position of the route point, when the lookup succeeded.
    pub coordinates: Option<Coordinates>,
    /// Wet-bulb globe temperature average in °C.
    pub temperature: f64,
    /// Average relative humidity in %.
    pub humidity: f64,
    /// Wind speed in km/h.
    pub wind_speed: f64,
    /// Precipitation probability in %.
    pub precipitation_probability: f64,
    /// Provider phrase describing the period.
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Ordered itinerary: optional start and end with intermediate stops.
pub struct Route {
    /// First point of the route.
    pub start: Option<String>,
    /// Last point of the route.
    pub end: Option<String>,
    /// Stops between start and end, in travel order.
    pub intermediates: Vec<String>,
}

impl Route {
    /// Build a route from its endpoints and stops.
    #[must_use]
    pub fn new<S: Into<String>, E: Into<String>>(
        start: Option<S>,
        end: Option<E>,
        intermediates: Vec<String>,
    ) -> Self {
        Self {
            start: start.map(Into::into),
            end: end.map(Into::into),
            intermediates,
        }
    }

    /// Append a stop, returning the updated route. Blank names are ignored.
    #[must_use]
    pub fn with_intermediate<S: Into<String>>(mut self, name: S) -> Self {
        let name = name.into();
        if !is_blank(&name) {
            self.intermediates.push(name);
        }
        self
    }

    /// Remove the stop at `index`, returning the updated route.
    #[must_use]
    pub fn without_intermediate(mut self, index: usize) -> Self {
        if index < self.intermediates.len() {
            self.intermediates.remove(index);
        }
        self
    }

    /// All non-blank points in `[start, *intermediates, end]` order.
    pub fn points(&self) -> impl Iterator<Item = &str> {
        self.start
            .as_deref()
            .into_iter()
            .chain(self.intermediates.iter().map(String::as_str))
            .chain(self.end.as_deref())
            .filter(|name| !is_blank(name))
    }

    /// Points deduplicated by exact name, keeping the first occurrence.
    #[must_use]
    pub fn distinct_points(&self) -> Vec<&str> {
        let mut distinct: Vec<&str> = Vec::new();
        for name in self.points() {
            if !distinct.contains(&name) {
                distinct.push(name);
            }
        }
        distinct
    }
}

fn is_blank(name: &str) -> bool {
    name.trim().is_empty()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Why a route point is missing rows in the dataset.
pub enum SkipReason {
    /// The provider did not resolve the name to a location key.
    Unresolved,
    /// No forecast data was returned for the resolved key.
    NoForecast,
    /// Fewer days were available than requested.
    Truncated {
        /// Days asked for.
        requested: usize,
        /// Days the provider delivered.
        available: usize,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unresolved => write!(formatter, "location not found"),
            SkipReason::NoForecast => write!(formatter, "no forecast data"),
            SkipReason::Truncated {
                requested,
                available,
            } => write!(formatter, "only {available} of {requested} days available"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Route point that contributed fewer rows than requested.
pub struct SkippedPoint {
    /// Route point name.
    pub name: String,
    /// What went wrong.
    pub reason: SkipReason,
}
