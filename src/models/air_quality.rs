//! Pollutant readings and derived air-quality samples

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Station;

/// Named pollutant concentrations for one station at one timestamp, in µg/m³.
///
/// All values are non-negative. A value of 0.0 means "absent or measured
/// zero": the upstream network reports missing parameters as zero, so the
/// two cases cannot be told apart here. Known imprecision, kept to match
/// provider behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PollutantReading {
    /// Particulate matter up to 2.5 µm
    pub pm25: f64,
    /// Particulate matter up to 10 µm
    pub pm10: f64,
    /// Nitrogen dioxide
    pub no2: f64,
    /// Ozone
    pub o3: f64,
    /// Sulfur dioxide
    pub so2: f64,
    /// Carbon monoxide
    pub co: f64,
}

/// Whether a value came from a live upstream call or the synthetic
/// generator. Carried on every sample so callers *may* branch on it;
/// the aggregator itself never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Live,
    Synthetic,
}

/// One station's reading with its locally derived severity index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualitySample {
    pub station: Station,
    pub timestamp: DateTime<Utc>,
    pub reading: PollutantReading,
    /// Always recomputed here from the reading; never taken from upstream.
    pub index: f64,
    pub provenance: Provenance,
}
