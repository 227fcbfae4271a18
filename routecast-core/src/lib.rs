//! Core types and service wiring for the routecast route forecast dashboard.

/// Aggregated forecast table and its chart/map views.
pub mod dataset;
/// Domain models and identifiers shared by all providers.
pub mod model;
/// Bundle of ports that make up a weather provider.
pub mod plugin;
/// Traits describing the provider interfaces.
pub mod ports;
/// Projection of daily forecasts into chartable rows.
pub mod projection;
/// High-level service facade used by clients.
pub mod service;

pub use dataset::*;
pub use model::*;
pub use plugin::*;
pub use ports::*;
pub use projection::*;
pub use service::*;
