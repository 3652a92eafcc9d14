//! HTTP adapter for the regional air-quality monitoring network

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future::join_all;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

use super::{AirQualityProvider, DailyAirQuality};
use crate::config::AirQualityConfig;
use crate::error::UpstreamError;
use crate::models::{PollutantReading, Station};

/// Client for the station network API (HTTP basic auth).
pub struct AirQualityClient {
    client: Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
    region: String,
    deadline: Duration,
}

impl AirQualityClient {
    /// Build a client from configuration. The per-call deadline is applied
    /// at the HTTP client level, so an expired call surfaces as a timeout.
    pub fn new(config: &AirQualityConfig, region: &str) -> Result<Self> {
        let deadline = config.deadline();
        let client = Client::builder()
            .timeout(deadline)
            .user_agent(concat!("airsight/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create air-quality HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            region: region.to_string(),
            deadline,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, UpstreamError> {
        let mut request = self.client.get(url);
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_deref());
        }

        let response = request
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, self.deadline))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::from_status(status, &body));
        }

        response
            .json()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, self.deadline))
    }

    async fn fetch_reading(&self, station_id: u32) -> Result<PollutantReading, UpstreamError> {
        let url = format!("{}/stations/{station_id}/current", self.base_url);
        let measurements: wire::StationMeasurements = self.get_json(&url).await?;
        Ok(measurements.into_reading())
    }
}

#[async_trait]
impl AirQualityProvider for AirQualityClient {
    async fn list_stations(&self) -> Result<Vec<Station>, UpstreamError> {
        let url = format!("{}/stations", self.base_url);
        let entries: Vec<wire::StationEntry> = self.get_json(&url).await?;

        let total = entries.len();
        let stations: Vec<Station> = entries
            .into_iter()
            .map(Station::from)
            .filter(|s| s.matches_region(&self.region))
            .collect();
        debug!(
            total,
            matching = stations.len(),
            region = %self.region,
            "fetched station list"
        );
        Ok(stations)
    }

    async fn current_readings(&self, station_ids: &[u32]) -> HashMap<u32, PollutantReading> {
        let results = join_all(
            station_ids
                .iter()
                .map(async |&id| (id, self.fetch_reading(id).await))
                .collect::<Vec<_>>(),
        )
        .await;

        let mut readings = HashMap::new();
        for (id, result) in results {
            match result {
                Ok(reading) => {
                    readings.insert(id, reading);
                }
                Err(err) => {
                    warn!(station = id, %err, "station reading failed; caller falls back");
                }
            }
        }
        readings
    }

    async fn historical(
        &self,
        station_id: u32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyAirQuality>, UpstreamError> {
        let url = format!(
            "{}/stations/{station_id}/daily?from={}&to={}",
            self.base_url,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
        );
        let entries: Vec<wire::DailyEntry> = self.get_json(&url).await?;

        let mut days: Vec<DailyAirQuality> = entries
            .into_iter()
            .filter_map(|e| {
                e.pm25.map(|pm25| DailyAirQuality {
                    date: e.date,
                    pm25: pm25.max(0.0),
                })
            })
            .collect();
        days.sort_by_key(|d| d.date);
        Ok(days)
    }
}

/// Raw response structures of the station network API.
mod wire {
    use chrono::NaiveDate;
    use serde::Deserialize;

    use crate::models::{PollutantReading, Station};

    #[derive(Debug, Deserialize)]
    pub struct StationEntry {
        pub id: u32,
        pub name: String,
        pub latitude: f64,
        pub longitude: f64,
        pub commune: Option<CommuneEntry>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CommuneEntry {
        pub name: String,
    }

    impl From<StationEntry> for Station {
        fn from(entry: StationEntry) -> Self {
            Station {
                id: entry.id,
                name: entry.name,
                latitude: entry.latitude,
                longitude: entry.longitude,
                region: entry.commune.map(|c| c.name).unwrap_or_default(),
            }
        }
    }

    /// Per-station measurement listing: one entry per reported parameter.
    #[derive(Debug, Deserialize)]
    pub struct StationMeasurements {
        pub values: Vec<ParameterValue>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ParameterValue {
        pub parameter: String,
        pub value: Option<f64>,
    }

    impl StationMeasurements {
        /// Map the parameter codes onto the internal reading. Parameters
        /// the station does not report stay at zero, matching the
        /// network's own zero-for-absent convention.
        pub fn into_reading(self) -> PollutantReading {
            let mut reading = PollutantReading::default();
            for entry in self.values {
                let Some(value) = entry.value else { continue };
                let value = value.max(0.0);
                match entry.parameter.to_uppercase().as_str() {
                    "PM2.5" | "PM25" => reading.pm25 = value,
                    "PM10" => reading.pm10 = value,
                    "NO2" => reading.no2 = value,
                    "O3" => reading.o3 = value,
                    "SO2" => reading.so2 = value,
                    "CO" => reading.co = value,
                    other => {
                        tracing::debug!(parameter = other, "ignoring unknown parameter");
                    }
                }
            }
            reading
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct DailyEntry {
        pub date: NaiveDate,
        pub pm25: Option<f64>,
    }
}
