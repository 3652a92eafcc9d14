//! Synthetic substitutes for unavailable upstream data
//!
//! When a provider call fails, the aggregator swaps in values from this
//! module instead of surfacing a hole. The output matches the shape and
//! constraints of live data (non-negative concentrations, 24-point
//! forecasts) and follows plausible diurnal and seasonal curves with
//! bounded jitter, but makes no claim of statistical accuracy. Every
//! produced sample is tagged [`Provenance::Synthetic`].

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc};
use rand::RngExt;
use std::f64::consts::PI;

use crate::aqi::compute_index;
use crate::models::{HistoricalPoint, PollutantReading, Provenance, Station, WeatherSample};

/// Seasonal mean temperature in °C for a day of year, peaking mid-July.
fn seasonal_temperature(day_of_year: f64) -> f64 {
    9.0 + 10.0 * (2.0 * PI * (day_of_year - 196.0) / 365.0).cos()
}

/// Normalized seasonal intensity: 1.0 mid-summer, 0.0 mid-winter.
fn summer_factor(day_of_year: f64) -> f64 {
    (1.0 + (2.0 * PI * (day_of_year - 196.0) / 365.0).cos()) / 2.0
}

/// Traffic-shaped multiplier peaking around the 08:00 and 20:00 rush hours.
fn rush_factor(hour: f64) -> f64 {
    1.0 + 0.3 * (2.0 * PI * (hour - 8.0) / 12.0).cos()
}

/// Daylight intensity: 0.0 outside 06:00-20:00, sine-shaped in between.
fn daylight(hour: f64) -> f64 {
    if (6.0..=20.0).contains(&hour) {
        (PI * (hour - 6.0) / 14.0).sin()
    } else {
        0.0
    }
}

/// Synthetic pollutant concentrations for one station at one instant.
///
/// Winter heating season and rush hours push the particulates up, the way
/// a real reading from the region would look on a dashboard.
#[must_use]
pub fn station_reading(_station: &Station, at: DateTime<Utc>) -> PollutantReading {
    let mut rng = rand::rng();
    let doy = f64::from(at.ordinal());
    let hour = f64::from(at.hour());

    let winter = 1.5 - summer_factor(doy);
    let rush = rush_factor(hour);

    let pm25 = (16.0 * winter * rush + rng.random_range(0.0..6.0)).max(0.0);
    let pm10 = (pm25 * 1.6 + rng.random_range(0.0..8.0)).max(0.0);
    let no2 = (22.0 * rush + rng.random_range(0.0..8.0)).max(0.0);
    let o3 = (40.0 * summer_factor(doy) * daylight(hour) + rng.random_range(0.0..10.0)).max(0.0);
    let so2 = (5.0 * winter + rng.random_range(0.0..3.0)).max(0.0);
    let co = (320.0 * winter * rush + rng.random_range(0.0..80.0)).max(0.0);

    PollutantReading {
        pm25,
        pm10,
        no2,
        o3,
        so2,
        co,
    }
}

/// Synthetic current conditions for one instant.
#[must_use]
pub fn current_weather(at: DateTime<Utc>) -> WeatherSample {
    let mut rng = rand::rng();
    let doy = f64::from(at.ordinal());
    let hour = f64::from(at.hour());

    let temperature_c = seasonal_temperature(doy)
        + 4.0 * (2.0 * PI * (hour - 14.0) / 24.0).cos()
        + rng.random_range(-1.0..1.0);
    let humidity_pct = (75.0 - 15.0 * (2.0 * PI * (hour - 4.0) / 24.0).cos()
        + rng.random_range(-5.0..5.0))
    .clamp(15.0, 100.0);
    let wind_speed_ms = 2.5 + rng.random_range(0.0..2.5);
    let pressure_hpa = 1013.0 + rng.random_range(-6.0..6.0);
    let uv_index = (6.0 * summer_factor(doy) * daylight(hour) + rng.random_range(0.0..0.5))
        * if daylight(hour) > 0.0 { 1.0 } else { 0.0 };

    WeatherSample {
        timestamp: at,
        temperature_c,
        humidity_pct,
        wind_speed_ms,
        pressure_hpa,
        uv_index,
        provenance: Provenance::Synthetic,
    }
}

/// Synthetic 24-point hourly forecast starting after `from`.
#[must_use]
pub fn hourly_forecast(from: DateTime<Utc>) -> Vec<WeatherSample> {
    (0..24)
        .map(|i| current_weather(from + Duration::hours(i64::from(i) + 1)))
        .collect()
}

/// Synthetic daily history of `days` points ending at `until`, ascending.
///
/// Requesting zero days returns an empty sequence; the generator never
/// fabricates a dataset nothing asked for.
#[must_use]
pub fn history(days: u32, until: NaiveDate) -> Vec<HistoricalPoint> {
    let mut rng = rand::rng();
    (0..days)
        .map(|i| {
            let date = until - Duration::days(i64::from(days - 1 - i));
            let doy = f64::from(date.ordinal());
            let winter = 1.5 - summer_factor(doy);

            let pm25 = (18.0 * winter + rng.random_range(0.0..10.0)).max(0.0);
            let reading = PollutantReading {
                pm25,
                ..Default::default()
            };

            HistoricalPoint {
                date,
                index: compute_index(&reading),
                pm25,
                temperature_c: Some(seasonal_temperature(doy) + rng.random_range(-2.0..2.0)),
                provenance: Provenance::Synthetic,
            }
        })
        .collect()
}
