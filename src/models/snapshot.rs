//! The aggregated snapshot exposed to consumers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aqi::SeverityBand;
use crate::models::{AirQualitySample, HistoricalPoint, Station, WeatherSample};

/// The result of one aggregation cycle.
///
/// Every field is fully populated — live or fallback — so consumers never
/// have to branch on absence. Immutable after construction; a new cycle
/// replaces the whole snapshot atomically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Stations in the target region, as returned this cycle
    pub stations: Vec<Station>,
    /// One sample per station
    pub air_quality: Vec<AirQualitySample>,
    /// Current conditions
    pub weather: WeatherSample,
    /// Hourly forecast, fixed 24-point horizon
    pub hourly_forecast: Vec<WeatherSample>,
    /// Daily lookback window, ascending by date
    pub history: Vec<HistoricalPoint>,
    /// Mean severity index across all stations; 0.0 when there are none
    pub mean_index: f64,
    /// Advisories derived from the configured alert rules
    pub advisories: Vec<Advisory>,
    /// Construction time of this snapshot
    pub generated_at: DateTime<Utc>,
}

impl Snapshot {
    /// Severity band of the mean index, shared by display and alerting.
    #[must_use]
    pub fn severity(&self) -> SeverityBand {
        SeverityBand::from_index(self.mean_index)
    }
}

/// One active alert, derived from the mean index each cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub band: SeverityBand,
    pub message: String,
}
