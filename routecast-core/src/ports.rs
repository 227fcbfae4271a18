//! Traits describing provider capabilities and the errors they report.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;

use crate::model::{Coordinates, DailyForecast, LocationKey};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to provider backends.
pub enum PortError {
    /// Connection failed or timed out.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// Provider answered with a non-success status.
    #[error("Provider returned status {status}")]
    Provider {
        /// HTTP status code.
        status: u16,
    },
    /// Provider returned no matches.
    #[error("No matching location")]
    NotFound,
    /// Response body was not the expected shape.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

#[async_trait]
/// Trait for provider-specific location lookups.
pub trait LocationPort: Send + Sync {
    /// Resolve a free-text place name to the first matching location key.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::NotFound`] when nothing matches, or another [`PortError`]
    /// when the provider request fails.
    async fn resolve(&self, name: &str) -> Result<LocationKey, PortError>;

    /// Look up the geographic position of a resolved location.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the provider request fails or the position is missing.
    async fn coordinates(&self, key: &LocationKey) -> Result<Coordinates, PortError>;
}

#[async_trait]
/// Trait for provider-specific daily forecast backends.
pub trait ForecastPort: Send + Sync {
    /// Fetch the provider's multi-day daily forecast for a location, in date order.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the provider request fails or a day is incomplete.
    async fn daily_forecast(&self, key: &LocationKey) -> Result<Vec<DailyForecast>, PortError>;
}
