//! Daily history model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Provenance;

/// One day of the lookback window.
///
/// The index is derived from the particulate concentration; temperature is
/// optional because it comes from the weather provider and is dropped when
/// only that side of the history failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub index: f64,
    /// Daily mean PM2.5 in µg/m³
    pub pm25: f64,
    pub temperature_c: Option<f64>,
    pub provenance: Provenance,
}
