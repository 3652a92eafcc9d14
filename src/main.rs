use std::sync::Arc;

use anyhow::Result;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use airsight::aggregator::Aggregator;
use airsight::api::ApiState;
use airsight::config::AppConfig;
use airsight::providers::{AirQualityClient, WeatherClient};
use airsight::store::SnapshotStore;
use airsight::{service, web};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    if config.air_quality.username.is_none() {
        warn!("no air-quality credentials configured; expect fallback data");
    }
    if config.weather.api_token.is_none() {
        warn!("no weather token configured; expect fallback data");
    }

    let air = Arc::new(AirQualityClient::new(&config.air_quality, &config.region)?);
    let weather = Arc::new(WeatherClient::new(&config.weather)?);
    let aggregator = Arc::new(Aggregator::new(air, weather, config.alerts.clone()));
    let store = Arc::new(SnapshotStore::new());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let refresh = tokio::spawn(service::run_refresh_loop(
        aggregator.clone(),
        store.clone(),
        config.refresh_interval(),
        shutdown_rx,
    ));

    let state = ApiState { store, aggregator };
    tokio::select! {
        result = web::run(state, config.port) => result?,
        _ = tokio::signal::ctrl_c() => info!("shutdown signal received"),
    }

    let _ = shutdown_tx.send(true);
    refresh.await?;
    Ok(())
}
