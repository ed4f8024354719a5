use std::time::Duration;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

const PING_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub redis: &'static str,
}

/// `GET /health`
///
/// Always `ok`; `redis` reports the cache as `connected`, `disconnected` or
/// `not configured`.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let backend = state.fetcher.backend();

    let redis = if !backend.is_enabled() {
        "not configured"
    } else {
        match tokio::time::timeout(PING_TIMEOUT, backend.ping()).await {
            Ok(Ok(())) => "connected",
            Ok(Err(e)) => {
                tracing::warn!("Cache ping failed: {}", e);
                "disconnected"
            }
            Err(_) => {
                tracing::warn!("Cache ping timed out after {:?}", PING_TIMEOUT);
                "disconnected"
            }
        }
    };

    Json(HealthResponse { status: "ok", redis })
}
