//! Upstream provider adapters
//!
//! Each adapter translates one upstream API into the internal data model
//! and owns its raw-response parsing; callers only ever see domain types
//! and [`UpstreamError`]. The capability traits are the seam the
//! aggregator is built against, so tests and alternative providers plug
//! in without touching orchestration code.

pub mod air_quality;
pub mod weather;

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

use crate::error::UpstreamError;
use crate::models::{PollutantReading, Station, WeatherSample};

pub use air_quality::AirQualityClient;
pub use weather::WeatherClient;

/// One day of particulate history from the air-quality network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyAirQuality {
    pub date: NaiveDate,
    pub pm25: f64,
}

/// One day of mean temperature from the weather service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyTemperature {
    pub date: NaiveDate,
    pub temperature_c: f64,
}

/// Capability contract of the air-quality network.
#[async_trait]
pub trait AirQualityProvider: Send + Sync {
    /// Fetch all stations and filter to the target region. Fails whole on
    /// any upstream problem; never returns a partial list.
    async fn list_stations(&self) -> Result<Vec<Station>, UpstreamError>;

    /// Fetch current readings, one upstream call per station issued
    /// concurrently. Each call is independently fault-contained: failed
    /// stations are simply absent from the returned map.
    async fn current_readings(&self, station_ids: &[u32]) -> HashMap<u32, PollutantReading>;

    /// Date-bounded daily particulate history for one station, ascending.
    async fn historical(
        &self,
        station_id: u32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyAirQuality>, UpstreamError>;
}

/// Capability contract of the weather service.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current_weather(&self) -> Result<WeatherSample, UpstreamError>;

    /// Hourly forecast with a fixed 24-point horizon.
    async fn hourly_forecast(&self) -> Result<Vec<WeatherSample>, UpstreamError>;

    /// Date-bounded daily mean temperatures, ascending.
    async fn historical(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyTemperature>, UpstreamError>;
}
