//! Weather observation model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Provenance;

/// One weather observation, current or forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub timestamp: DateTime<Utc>,
    /// Temperature in Celsius
    pub temperature_c: f64,
    /// Relative humidity as a percentage (0-100)
    pub humidity_pct: f64,
    /// Wind speed in m/s
    pub wind_speed_ms: f64,
    /// Atmospheric pressure in hPa
    pub pressure_hpa: f64,
    /// UV index (0 at night)
    pub uv_index: f64,
    pub provenance: Provenance,
}
