//! Snapshot construction
//!
//! Orchestrates the concurrent fan-out over both providers, substitutes
//! synthetic data per quantity where a call failed, recomputes the
//! severity index locally, and derives the cycle's summary statistics.
//! Upstream unavailability never fails a cycle; only a violated internal
//! invariant does.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use chrono::{NaiveDate, Utc};
use tracing::{debug, info, instrument, warn};

use crate::aqi::{SeverityBand, compute_index};
use crate::config::AlertRule;
use crate::error::{AggregationError, UpstreamError};
use crate::fallback;
use crate::models::{
    Advisory, AirQualitySample, HistoricalPoint, PollutantReading, Provenance, Snapshot,
};
use crate::providers::{AirQualityProvider, WeatherProvider};

/// Fixed hourly forecast horizon carried by every snapshot.
pub const FORECAST_HOURS: usize = 24;
/// Fixed daily lookback window carried by every snapshot.
pub const HISTORY_DAYS: u32 = 30;

/// Operational counters for one provider's absorbed failures.
///
/// Failures never propagate to snapshot consumers, so this is the only
/// place they remain visible.
#[derive(Debug, Default)]
pub struct ProviderHealth {
    failures: AtomicU64,
    last_error: Mutex<Option<String>>,
}

impl ProviderHealth {
    fn record(&self, context: &str, err: &UpstreamError) {
        warn!(context, %err, "upstream call failed; substituting synthetic data");
        self.note(format!("{context}: {err}"));
    }

    fn record_miss(&self, message: String) {
        warn!(%message, "upstream data missing; substituting synthetic data");
        self.note(message);
    }

    fn note(&self, message: String) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        *self.last_error.lock().unwrap() = Some(message);
    }

    #[must_use]
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }

    #[must_use]
    pub fn report(&self) -> HealthReport {
        HealthReport {
            failures: self.failures(),
            last_error: self.last_error(),
        }
    }
}

/// Serializable view of one provider's counters.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub failures: u64,
    pub last_error: Option<String>,
}

/// Health of both providers, as served by the API.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatorHealth {
    pub air_quality: HealthReport,
    pub weather: HealthReport,
}

/// Builds one snapshot per cycle from the injected provider adapters.
pub struct Aggregator {
    air: Arc<dyn AirQualityProvider>,
    weather: Arc<dyn WeatherProvider>,
    alert_rules: Vec<AlertRule>,
    air_health: ProviderHealth,
    weather_health: ProviderHealth,
}

impl Aggregator {
    pub fn new(
        air: Arc<dyn AirQualityProvider>,
        weather: Arc<dyn WeatherProvider>,
        alert_rules: Vec<AlertRule>,
    ) -> Self {
        Self {
            air,
            weather,
            alert_rules,
            air_health: ProviderHealth::default(),
            weather_health: ProviderHealth::default(),
        }
    }

    #[must_use]
    pub fn health(&self) -> AggregatorHealth {
        AggregatorHealth {
            air_quality: self.air_health.report(),
            weather: self.weather_health.report(),
        }
    }

    /// Build one fully populated snapshot.
    ///
    /// All upstream quantities are fetched concurrently and the merge waits
    /// for every call to settle; individual failures turn into fallback
    /// data for that quantity alone. The calls that need the station list
    /// (readings, particulate history) chain inside the station branch.
    #[instrument(skip(self))]
    pub async fn build_snapshot(&self) -> Result<Snapshot, AggregationError> {
        let now = Utc::now();
        let today = now.date_naive();
        let start = today - chrono::Duration::days(i64::from(HISTORY_DAYS));

        let air_branch = async {
            match self.air.list_stations().await {
                Ok(stations) => {
                    let ids: Vec<u32> = stations.iter().map(|s| s.id).collect();
                    let representative = stations.first().map(|s| s.id);
                    let (readings, history) = tokio::join!(
                        self.air.current_readings(&ids),
                        async {
                            match representative {
                                Some(id) => Some(self.air.historical(id, start, today).await),
                                None => None,
                            }
                        },
                    );
                    (Ok(stations), readings, history)
                }
                Err(err) => (Err(err), HashMap::new(), None),
            }
        };

        let ((stations_result, readings, aq_history), current_result, hourly_result, temps_result) =
            tokio::join!(
                air_branch,
                self.weather.current_weather(),
                self.weather.hourly_forecast(),
                self.weather.historical(start, today),
            );

        // Stations are identity data; when the listing fails there is
        // nothing meaningful to substitute, so the region reports no
        // stations this cycle rather than invented ones.
        let stations = match stations_result {
            Ok(stations) => stations,
            Err(err) => {
                self.air_health.record("station list", &err);
                Vec::new()
            }
        };

        let air_quality: Vec<AirQualitySample> = stations
            .iter()
            .map(|station| {
                let (reading, provenance) = match readings.get(&station.id) {
                    Some(reading) => (*reading, Provenance::Live),
                    None => {
                        self.air_health
                            .record_miss(format!("no reading for station {}", station.id));
                        (fallback::station_reading(station, now), Provenance::Synthetic)
                    }
                };
                AirQualitySample {
                    station: station.clone(),
                    timestamp: now,
                    reading,
                    // always derived here, upstream index values are ignored
                    index: compute_index(&reading),
                    provenance,
                }
            })
            .collect();

        let weather = match current_result {
            Ok(sample) => sample,
            Err(err) => {
                self.weather_health.record("current weather", &err);
                fallback::current_weather(now)
            }
        };

        let hourly_forecast = match hourly_result {
            Ok(hours) if !hours.is_empty() => hours,
            Ok(_) => {
                self.weather_health
                    .record_miss("hourly forecast returned no points".to_string());
                fallback::hourly_forecast(now)
            }
            Err(err) => {
                self.weather_health.record("hourly forecast", &err);
                fallback::hourly_forecast(now)
            }
        };

        let temperatures: HashMap<NaiveDate, f64> = match temps_result {
            Ok(days) => days.into_iter().map(|d| (d.date, d.temperature_c)).collect(),
            Err(err) => {
                self.weather_health.record("temperature history", &err);
                HashMap::new()
            }
        };

        let history: Vec<HistoricalPoint> = match aq_history {
            Some(Ok(days)) if !days.is_empty() => days
                .into_iter()
                .map(|day| {
                    let reading = PollutantReading {
                        pm25: day.pm25,
                        ..Default::default()
                    };
                    HistoricalPoint {
                        date: day.date,
                        index: compute_index(&reading),
                        pm25: day.pm25,
                        temperature_c: temperatures.get(&day.date).copied(),
                        provenance: Provenance::Live,
                    }
                })
                .collect(),
            Some(Ok(_)) => {
                self.air_health
                    .record_miss("history query returned no days".to_string());
                fallback::history(HISTORY_DAYS, today)
            }
            Some(Err(err)) => {
                self.air_health.record("particulate history", &err);
                fallback::history(HISTORY_DAYS, today)
            }
            None => {
                debug!("no stations available; history falls back");
                fallback::history(HISTORY_DAYS, today)
            }
        };

        let mean_index = mean_index(&air_quality);
        let advisories = derive_advisories(mean_index, &self.alert_rules);

        let snapshot = Snapshot {
            stations,
            air_quality,
            weather,
            hourly_forecast,
            history,
            mean_index,
            advisories,
            generated_at: now,
        };
        verify(&snapshot)?;

        info!(
            stations = snapshot.stations.len(),
            mean_index = snapshot.mean_index,
            advisories = snapshot.advisories.len(),
            "snapshot built"
        );
        Ok(snapshot)
    }
}

/// Mean severity index across all samples; 0.0 when there are none.
fn mean_index(samples: &[AirQualitySample]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|s| s.index).sum::<f64>() / samples.len() as f64
}

/// Test the mean index against every configured rule. Adding alert
/// conditions is a configuration change, not a code change.
fn derive_advisories(mean_index: f64, rules: &[AlertRule]) -> Vec<Advisory> {
    rules
        .iter()
        .filter(|rule| mean_index > rule.min_index)
        .map(|rule| Advisory {
            band: SeverityBand::from_index(mean_index),
            message: rule.message.clone(),
        })
        .collect()
}

/// Completeness checks on the merged snapshot. A violation here is a
/// defect in the merge itself, not an upstream condition.
fn verify(snapshot: &Snapshot) -> Result<(), AggregationError> {
    if snapshot.hourly_forecast.len() != FORECAST_HOURS {
        return Err(AggregationError::invariant(format!(
            "hourly forecast has {} points, expected {FORECAST_HOURS}",
            snapshot.hourly_forecast.len()
        )));
    }
    if snapshot.air_quality.len() != snapshot.stations.len() {
        return Err(AggregationError::invariant(format!(
            "{} samples for {} stations",
            snapshot.air_quality.len(),
            snapshot.stations.len()
        )));
    }
    if snapshot.history.is_empty() {
        return Err(AggregationError::invariant(
            "history is empty after fallback".to_string(),
        ));
    }
    if !snapshot.history.windows(2).all(|pair| pair[0].date < pair[1].date) {
        return Err(AggregationError::invariant(
            "history dates are not strictly ascending".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Station;
    use chrono::NaiveDate;

    fn sample(index: f64) -> AirQualitySample {
        AirQualitySample {
            station: Station {
                id: 1,
                name: "Test".to_string(),
                latitude: 0.0,
                longitude: 0.0,
                region: "Test".to_string(),
            },
            timestamp: Utc::now(),
            reading: PollutantReading::default(),
            index,
            provenance: Provenance::Live,
        }
    }

    fn rules() -> Vec<AlertRule> {
        vec![AlertRule {
            min_index: 100.0,
            message: "sensitive groups advisory".to_string(),
        }]
    }

    #[test]
    fn test_mean_index_is_zero_without_stations() {
        assert_eq!(mean_index(&[]), 0.0);
    }

    #[test]
    fn test_mean_index_averages_all_samples() {
        let samples = vec![sample(50.0), sample(100.0), sample(150.0)];
        assert_eq!(mean_index(&samples), 100.0);
    }

    #[test]
    fn test_advisory_fires_above_threshold() {
        let advisories = derive_advisories(120.0, &rules());
        assert_eq!(advisories.len(), 1);
        assert_eq!(advisories[0].band, SeverityBand::UnhealthySensitive);
    }

    #[test]
    fn test_no_advisory_at_or_below_threshold() {
        assert!(derive_advisories(80.0, &rules()).is_empty());
        assert!(derive_advisories(100.0, &rules()).is_empty());
    }

    #[test]
    fn test_verify_rejects_short_forecast() {
        let now = Utc::now();
        let today = now.date_naive();
        let snapshot = Snapshot {
            stations: Vec::new(),
            air_quality: Vec::new(),
            weather: fallback::current_weather(now),
            hourly_forecast: fallback::hourly_forecast(now)[..7].to_vec(),
            history: fallback::history(HISTORY_DAYS, today),
            mean_index: 0.0,
            advisories: Vec::new(),
            generated_at: now,
        };
        assert!(verify(&snapshot).is_err());
    }

    #[test]
    fn test_verify_rejects_unordered_history() {
        let now = Utc::now();
        let mut history = fallback::history(HISTORY_DAYS, now.date_naive());
        history[0].date = NaiveDate::from_ymd_opt(2099, 1, 1).unwrap();
        let snapshot = Snapshot {
            stations: Vec::new(),
            air_quality: Vec::new(),
            weather: fallback::current_weather(now),
            hourly_forecast: fallback::hourly_forecast(now),
            history,
            mean_index: 0.0,
            advisories: Vec::new(),
            generated_at: now,
        };
        assert!(verify(&snapshot).is_err());
    }

    #[test]
    fn test_provider_health_counts_absorbed_failures() {
        let health = ProviderHealth::default();
        assert_eq!(health.failures(), 0);
        assert!(health.last_error().is_none());

        health.record(
            "station list",
            &UpstreamError::network("connection reset"),
        );
        health.record_miss("no reading for station 7".to_string());

        assert_eq!(health.failures(), 2);
        let last = health.last_error().unwrap();
        assert!(last.contains("station 7"));
    }
}
