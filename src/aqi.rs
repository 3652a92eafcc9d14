//! Severity index computation and banding
//!
//! The index is a simplified severity score, not a regulatory-grade AQI:
//! each regulated pollutant is scaled against a fixed reference
//! concentration and the worst pollutant drives the result.

use serde::{Deserialize, Serialize};

use crate::models::PollutantReading;

/// Reference concentrations (µg/m³) at which a pollutant alone puts the
/// index at 100.
const PM25_REFERENCE: f64 = 25.0;
const PM10_REFERENCE: f64 = 50.0;
const NO2_REFERENCE: f64 = 40.0;

/// Highest index this scale reports.
pub const INDEX_CEILING: f64 = 300.0;

/// Per-pollutant intermediate score before the worst-case reduction.
fn sub_index(concentration: f64, reference: f64) -> f64 {
    ((concentration / reference) * 100.0).min(INDEX_CEILING)
}

/// Derive the severity index for one reading.
///
/// The result is the maximum of the per-pollutant sub-indices, so the
/// overall indicator reflects the most severe dimension rather than an
/// average. A zero concentration yields a zero sub-index, which also
/// covers parameters the upstream omitted (see the zero-for-absent note
/// on [`PollutantReading`]). Deterministic given the input.
#[must_use]
pub fn compute_index(reading: &PollutantReading) -> f64 {
    [
        sub_index(reading.pm25, PM25_REFERENCE),
        sub_index(reading.pm10, PM10_REFERENCE),
        sub_index(reading.no2, NO2_REFERENCE),
    ]
    .into_iter()
    .fold(0.0, f64::max)
}

/// Severity banding shared by presentation and alerting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityBand {
    Good,
    Moderate,
    UnhealthySensitive,
    Unhealthy,
    VeryUnhealthy,
}

impl SeverityBand {
    /// Pure lookup from an index value to its band.
    #[must_use]
    pub fn from_index(index: f64) -> Self {
        match index {
            i if i <= 50.0 => SeverityBand::Good,
            i if i <= 100.0 => SeverityBand::Moderate,
            i if i <= 150.0 => SeverityBand::UnhealthySensitive,
            i if i <= 200.0 => SeverityBand::Unhealthy,
            _ => SeverityBand::VeryUnhealthy,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            SeverityBand::Good => "Good",
            SeverityBand::Moderate => "Moderate",
            SeverityBand::UnhealthySensitive => "Unhealthy for Sensitive Groups",
            SeverityBand::Unhealthy => "Unhealthy",
            SeverityBand::VeryUnhealthy => "Very Unhealthy",
        }
    }

    /// Display color for this band.
    #[must_use]
    pub fn color(&self) -> &'static str {
        match self {
            SeverityBand::Good => "#00E400",
            SeverityBand::Moderate => "#FFFF00",
            SeverityBand::UnhealthySensitive => "#FF7E00",
            SeverityBand::Unhealthy => "#FF0000",
            SeverityBand::VeryUnhealthy => "#8F3F97",
        }
    }
}

impl std::fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn reading(pm25: f64, pm10: f64, no2: f64) -> PollutantReading {
        PollutantReading {
            pm25,
            pm10,
            no2,
            ..Default::default()
        }
    }

    #[test]
    fn test_all_zero_reading_scores_zero() {
        assert_eq!(compute_index(&PollutantReading::default()), 0.0);
    }

    #[test]
    fn test_reference_concentration_scores_one_hundred() {
        assert_eq!(compute_index(&reading(25.0, 0.0, 0.0)), 100.0);
        assert_eq!(compute_index(&reading(0.0, 50.0, 0.0)), 100.0);
        assert_eq!(compute_index(&reading(0.0, 0.0, 40.0)), 100.0);
    }

    #[test]
    fn test_worst_pollutant_drives_index() {
        // pm25 sub-index 200, pm10 sub-index 50, no2 sub-index 25
        let r = reading(50.0, 25.0, 10.0);
        assert_eq!(compute_index(&r), 200.0);
    }

    #[test]
    fn test_index_is_capped() {
        let r = reading(10_000.0, 10_000.0, 10_000.0);
        assert_eq!(compute_index(&r), INDEX_CEILING);
    }

    #[test]
    fn test_unregulated_pollutants_do_not_contribute() {
        let r = PollutantReading {
            o3: 500.0,
            so2: 500.0,
            co: 500.0,
            ..Default::default()
        };
        assert_eq!(compute_index(&r), 0.0);
    }

    #[test]
    fn test_index_is_deterministic_and_bounded() {
        let r = reading(33.3, 47.1, 12.9);
        let first = compute_index(&r);
        assert_eq!(first, compute_index(&r));
        assert!(first >= 0.0);
        assert!(first <= INDEX_CEILING);
    }

    #[rstest]
    #[case(0.0, SeverityBand::Good)]
    #[case(50.0, SeverityBand::Good)]
    #[case(50.1, SeverityBand::Moderate)]
    #[case(100.0, SeverityBand::Moderate)]
    #[case(120.0, SeverityBand::UnhealthySensitive)]
    #[case(150.0, SeverityBand::UnhealthySensitive)]
    #[case(200.0, SeverityBand::Unhealthy)]
    #[case(200.1, SeverityBand::VeryUnhealthy)]
    #[case(300.0, SeverityBand::VeryUnhealthy)]
    fn test_banding(#[case] index: f64, #[case] expected: SeverityBand) {
        assert_eq!(SeverityBand::from_index(index), expected);
    }

    #[test]
    fn test_band_labels_and_colors() {
        assert_eq!(SeverityBand::Good.label(), "Good");
        assert_eq!(SeverityBand::from_index(125.0).label(), "Unhealthy for Sensitive Groups");
        assert_eq!(SeverityBand::Good.color(), "#00E400");
        assert_eq!(SeverityBand::VeryUnhealthy.color(), "#8F3F97");
    }
}
