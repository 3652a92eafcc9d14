//! Data models for the airsight service
//!
//! Core domain types organized by concern:
//! - Station: monitoring station identity and location
//! - Air quality: pollutant readings and derived samples
//! - Weather: current and forecast observations
//! - History: daily lookback points
//! - Snapshot: the aggregated result exposed to consumers

pub mod air_quality;
pub mod history;
pub mod snapshot;
pub mod station;
pub mod weather;

// Re-export all public types for convenient access
pub use air_quality::{AirQualitySample, PollutantReading, Provenance};
pub use history::HistoricalPoint;
pub use snapshot::{Advisory, Snapshot};
pub use station::Station;
pub use weather::WeatherSample;
