//! Monitoring station identity and location

use serde::{Deserialize, Serialize};

/// One air-quality monitoring station.
///
/// Immutable once fetched; the station list is re-fetched on every
/// aggregation cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: u32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Administrative region the station reports under
    pub region: String,
}

impl Station {
    /// Case-insensitive substring match of `needle` against the station's
    /// region and name. Used to filter the upstream station list to the
    /// target metropolitan area.
    #[must_use]
    pub fn matches_region(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.region.to_lowercase().contains(&needle)
            || self.name.to_lowercase().contains(&needle)
    }
}
