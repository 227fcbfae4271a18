//! Bundle of ports implementing a single weather provider.

use std::sync::Arc;

use crate::model::ProviderMeta;
use crate::ports::{ForecastPort, LocationPort};

/// Collection of ports implementing a weather provider.
pub struct ProviderPlugin {
    /// Static metadata describing the provider.
    pub meta: ProviderMeta,
    /// Implementation for resolving names and coordinates.
    pub location_port: Arc<dyn LocationPort>,
    /// Implementation for fetching daily forecasts.
    pub forecast_port: Arc<dyn ForecastPort>,
}

impl ProviderPlugin {
    /// Bundle the given ports under the provider metadata.
    #[must_use]
    pub fn new(
        meta: ProviderMeta,
        location_port: Arc<dyn LocationPort>,
        forecast_port: Arc<dyn ForecastPort>,
    ) -> Self {
        Self {
            meta,
            location_port,
            forecast_port,
        }
    }
}
