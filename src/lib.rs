//! Airsight - environmental telemetry aggregation
//!
//! This library fetches air-quality measurements and weather observations
//! from two independent upstream providers, derives a severity index per
//! station, and publishes one consistent snapshot per refresh cycle,
//! degrading to synthetic data per quantity when an upstream is
//! unavailable.

pub mod aggregator;
pub mod api;
pub mod aqi;
pub mod config;
pub mod error;
pub mod fallback;
pub mod models;
pub mod providers;
pub mod service;
pub mod store;
pub mod web;

// Re-export core types for public API
pub use aggregator::{Aggregator, AggregatorHealth, ProviderHealth};
pub use aqi::{SeverityBand, compute_index};
pub use config::{AlertRule, AppConfig};
pub use error::{AggregationError, UpstreamError};
pub use models::{
    Advisory, AirQualitySample, HistoricalPoint, PollutantReading, Provenance, Snapshot, Station,
    WeatherSample,
};
pub use providers::{AirQualityClient, AirQualityProvider, WeatherClient, WeatherProvider};
pub use store::SnapshotStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
