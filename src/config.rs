//! Configuration for the airsight service
//!
//! All settings come from environment variables with sensible defaults;
//! credentials for the upstream providers are environment-only and never
//! written to disk.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Root configuration for the airsight service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Target metropolitan region; stations are filtered against it
    pub region: String,
    /// Air-quality network settings
    pub air_quality: AirQualityConfig,
    /// Weather service settings
    pub weather: WeatherConfig,
    /// Seconds between aggregation cycles
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    /// Port for the snapshot API
    #[serde(default = "default_port")]
    pub port: u16,
    /// Alert rules tested against the mean index each cycle.
    /// Extend this list to add conditions; the aggregator just iterates it.
    #[serde(default = "default_alerts")]
    pub alerts: Vec<AlertRule>,
}

/// Air-quality network settings (HTTP basic auth)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirQualityConfig {
    #[serde(default = "default_air_quality_base_url")]
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Per-call deadline in seconds
    #[serde(default = "default_air_quality_timeout")]
    pub timeout_secs: u64,
}

/// Weather service settings (bearer token, fixed coordinates)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    pub api_token: Option<String>,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    /// Per-call deadline in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_secs: u64,
}

/// One alert condition: fires when the cycle's mean index exceeds `min_index`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRule {
    pub min_index: f64,
    pub message: String,
}

// Default value functions

fn default_region() -> String {
    "Kraków".to_string()
}

fn default_air_quality_base_url() -> String {
    "https://api.airnet.example/v1".to_string()
}

fn default_air_quality_timeout() -> u64 {
    10
}

fn default_weather_base_url() -> String {
    "https://api.meteo.example/v1".to_string()
}

fn default_weather_timeout() -> u64 {
    15
}

fn default_latitude() -> f64 {
    50.0614
}

fn default_longitude() -> f64 {
    19.9372
}

fn default_refresh_interval() -> u64 {
    300
}

fn default_port() -> u16 {
    8080
}

fn default_alerts() -> Vec<AlertRule> {
    vec![AlertRule {
        min_index: 100.0,
        message: "Air quality may affect sensitive groups; consider limiting prolonged outdoor exertion.".to_string(),
    }]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            air_quality: AirQualityConfig {
                base_url: default_air_quality_base_url(),
                username: None,
                password: None,
                timeout_secs: default_air_quality_timeout(),
            },
            weather: WeatherConfig {
                base_url: default_weather_base_url(),
                api_token: None,
                latitude: default_latitude(),
                longitude: default_longitude(),
                timeout_secs: default_weather_timeout(),
            },
            refresh_interval_secs: default_refresh_interval(),
            port: default_port(),
            alerts: default_alerts(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `AIRSIGHT_*` environment variables on top of
    /// the defaults, then validate.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(region) = env::var("AIRSIGHT_REGION") {
            config.region = region;
        }
        if let Ok(url) = env::var("AIRSIGHT_AQ_BASE_URL") {
            config.air_quality.base_url = url;
        }
        config.air_quality.username = env::var("AIRSIGHT_AQ_USERNAME").ok();
        config.air_quality.password = env::var("AIRSIGHT_AQ_PASSWORD").ok();
        if let Ok(secs) = env::var("AIRSIGHT_AQ_TIMEOUT_SECS") {
            config.air_quality.timeout_secs = secs
                .parse()
                .context("AIRSIGHT_AQ_TIMEOUT_SECS must be an integer number of seconds")?;
        }

        if let Ok(url) = env::var("AIRSIGHT_WEATHER_BASE_URL") {
            config.weather.base_url = url;
        }
        config.weather.api_token = env::var("AIRSIGHT_WEATHER_TOKEN").ok();
        if let Ok(lat) = env::var("AIRSIGHT_LATITUDE") {
            config.weather.latitude = lat
                .parse()
                .context("AIRSIGHT_LATITUDE must be a decimal degree value")?;
        }
        if let Ok(lon) = env::var("AIRSIGHT_LONGITUDE") {
            config.weather.longitude = lon
                .parse()
                .context("AIRSIGHT_LONGITUDE must be a decimal degree value")?;
        }
        if let Ok(secs) = env::var("AIRSIGHT_WEATHER_TIMEOUT_SECS") {
            config.weather.timeout_secs = secs
                .parse()
                .context("AIRSIGHT_WEATHER_TIMEOUT_SECS must be an integer number of seconds")?;
        }

        if let Ok(secs) = env::var("AIRSIGHT_REFRESH_INTERVAL_SECS") {
            config.refresh_interval_secs = secs
                .parse()
                .context("AIRSIGHT_REFRESH_INTERVAL_SECS must be an integer number of seconds")?;
        }
        if let Ok(port) = env::var("AIRSIGHT_PORT") {
            config.port = port.parse().context("AIRSIGHT_PORT must be a port number")?;
        }
        if let Ok(alerts) = env::var("AIRSIGHT_ALERTS") {
            config.alerts = serde_json::from_str(&alerts)
                .context("AIRSIGHT_ALERTS must be a JSON list of {min_index, message} rules")?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        if self.region.trim().is_empty() {
            bail!("Region cannot be empty");
        }

        for (name, url) in [
            ("air-quality", &self.air_quality.base_url),
            ("weather", &self.weather.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                bail!("The {name} base URL must be a valid HTTP or HTTPS URL");
            }
        }

        for (name, secs) in [
            ("air-quality", self.air_quality.timeout_secs),
            ("weather", self.weather.timeout_secs),
        ] {
            if secs == 0 || secs > 300 {
                bail!("The {name} timeout must be between 1 and 300 seconds");
            }
        }

        if !(-90.0..=90.0).contains(&self.weather.latitude) {
            bail!("Latitude must be between -90 and 90 degrees");
        }
        if !(-180.0..=180.0).contains(&self.weather.longitude) {
            bail!("Longitude must be between -180 and 180 degrees");
        }

        if self.refresh_interval_secs < 30 {
            bail!("Refresh interval cannot be shorter than 30 seconds");
        }

        for rule in &self.alerts {
            if rule.min_index < 0.0 {
                bail!("Alert thresholds must be non-negative");
            }
            if rule.message.trim().is_empty() {
                bail!("Alert messages cannot be empty");
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

impl AirQualityConfig {
    #[must_use]
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl WeatherConfig {
    #[must_use]
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.region, "Kraków");
        assert_eq!(config.air_quality.timeout_secs, 10);
        assert_eq!(config.weather.timeout_secs, 15);
        assert_eq!(config.refresh_interval_secs, 300);
        assert_eq!(config.alerts.len(), 1);
        assert_eq!(config.alerts[0].min_index, 100.0);
        assert!(config.air_quality.username.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_base_url() {
        let mut config = AppConfig::default();
        config.weather.base_url = "ftp://meteo.example".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("base URL"));
    }

    #[test]
    fn test_validation_rejects_timeout_out_of_range() {
        let mut config = AppConfig::default();
        config.air_quality.timeout_secs = 500;
        assert!(config.validate().is_err());

        config.air_quality.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_coordinates() {
        let mut config = AppConfig::default();
        config.weather.latitude = 91.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_short_refresh_interval() {
        let mut config = AppConfig::default();
        config.refresh_interval_secs = 5;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Refresh interval"));
    }

    #[test]
    fn test_alert_rules_parse_from_json() {
        let rules: Vec<AlertRule> = serde_json::from_str(
            r#"[{"min_index": 100.0, "message": "sensitive groups"},
                {"min_index": 200.0, "message": "everyone indoors"}]"#,
        )
        .unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[1].min_index, 200.0);
    }

    #[test]
    fn test_environment_variable_override() {
        // SAFETY: Test environment, setting test values only
        unsafe {
            env::set_var("AIRSIGHT_REGION", "Gdańsk");
            env::set_var("AIRSIGHT_AQ_TIMEOUT_SECS", "20");
        }

        let config = AppConfig::from_env().unwrap();

        // SAFETY: Test cleanup
        unsafe {
            env::remove_var("AIRSIGHT_REGION");
            env::remove_var("AIRSIGHT_AQ_TIMEOUT_SECS");
        }

        assert_eq!(config.region, "Gdańsk");
        assert_eq!(config.air_quality.timeout_secs, 20);
    }
}
