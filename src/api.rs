//! Snapshot API surface

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
};
use std::sync::Arc;

use crate::aggregator::{Aggregator, AggregatorHealth};
use crate::models::Snapshot;
use crate::store::SnapshotStore;

/// Shared handler state, injected at construction.
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<SnapshotStore>,
    pub aggregator: Arc<Aggregator>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/snapshot", get(get_snapshot))
        .route("/health", get(get_health))
        .with_state(state)
}

/// Latest aggregated snapshot. 503 only before the first cycle has
/// completed; after that a snapshot is always available, live or
/// fallback.
async fn get_snapshot(State(state): State<ApiState>) -> Result<Json<Snapshot>, StatusCode> {
    state
        .store
        .latest()
        .map(|snapshot| Json(snapshot.as_ref().clone()))
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)
}

/// Absorbed-failure counters per provider.
async fn get_health(State(state): State<ApiState>) -> Json<AggregatorHealth> {
    Json(state.aggregator.health())
}
