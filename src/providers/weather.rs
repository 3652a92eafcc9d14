//! HTTP adapter for the weather service

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::{DailyTemperature, WeatherProvider};
use crate::config::WeatherConfig;
use crate::error::UpstreamError;
use crate::models::WeatherSample;

/// Forecast horizon the service is queried for; anything else is treated
/// as a malformed response.
const FORECAST_HOURS: usize = 24;

/// Client for the weather API (bearer token, fixed coordinates).
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_token: Option<String>,
    latitude: f64,
    longitude: f64,
    deadline: Duration,
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let deadline = config.deadline();
        let client = Client::builder()
            .timeout(deadline)
            .user_agent(concat!("airsight/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create weather HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_token: config.api_token.clone(),
            latitude: config.latitude,
            longitude: config.longitude,
            deadline,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, UpstreamError> {
        let mut request = self.client.get(url);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
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
}

/// Reject forecasts that do not carry the fixed 24-point horizon.
fn validate_horizon(hours: Vec<WeatherSample>) -> Result<Vec<WeatherSample>, UpstreamError> {
    if hours.len() == FORECAST_HOURS {
        Ok(hours)
    } else {
        Err(UpstreamError::malformed(format!(
            "expected {FORECAST_HOURS} hourly forecast points, got {}",
            hours.len()
        )))
    }
}

#[async_trait]
impl WeatherProvider for WeatherClient {
    async fn current_weather(&self) -> Result<WeatherSample, UpstreamError> {
        let url = format!(
            "{}/current?lat={}&lon={}",
            self.base_url, self.latitude, self.longitude
        );
        let current: wire::Observation = self.get_json(&url).await?;
        Ok(current.into_sample())
    }

    async fn hourly_forecast(&self) -> Result<Vec<WeatherSample>, UpstreamError> {
        let url = format!(
            "{}/forecast/hourly?lat={}&lon={}&hours={FORECAST_HOURS}",
            self.base_url, self.latitude, self.longitude
        );
        let forecast: wire::HourlyForecast = self.get_json(&url).await?;
        debug!(points = forecast.hours.len(), "fetched hourly forecast");

        let hours = forecast
            .hours
            .into_iter()
            .map(wire::Observation::into_sample)
            .collect();
        validate_horizon(hours)
    }

    async fn historical(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyTemperature>, UpstreamError> {
        let url = format!(
            "{}/history/daily?lat={}&lon={}&from={}&to={}",
            self.base_url,
            self.latitude,
            self.longitude,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
        );
        let history: wire::DailyHistory = self.get_json(&url).await?;

        let mut days: Vec<DailyTemperature> = history
            .days
            .into_iter()
            .map(|d| DailyTemperature {
                date: d.date,
                temperature_c: d.temperature_mean_c,
            })
            .collect();
        days.sort_by_key(|d| d.date);
        Ok(days)
    }
}

/// Raw response structures of the weather API.
mod wire {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::Deserialize;

    use crate::models::{Provenance, WeatherSample};

    /// One observation row, shared by the current and hourly endpoints.
    #[derive(Debug, Deserialize)]
    pub struct Observation {
        pub time: DateTime<Utc>,
        pub temperature_c: f64,
        pub humidity_pct: f64,
        pub wind_speed_ms: f64,
        pub pressure_hpa: f64,
        pub uv_index: Option<f64>,
    }

    impl Observation {
        pub fn into_sample(self) -> WeatherSample {
            WeatherSample {
                timestamp: self.time,
                temperature_c: self.temperature_c,
                humidity_pct: self.humidity_pct,
                wind_speed_ms: self.wind_speed_ms,
                pressure_hpa: self.pressure_hpa,
                uv_index: self.uv_index.unwrap_or(0.0),
                provenance: Provenance::Live,
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct HourlyForecast {
        pub hours: Vec<Observation>,
    }

    #[derive(Debug, Deserialize)]
    pub struct DailyHistory {
        pub days: Vec<DayEntry>,
    }

    #[derive(Debug, Deserialize)]
    pub struct DayEntry {
        pub date: NaiveDate,
        pub temperature_mean_c: f64,
    }
}
