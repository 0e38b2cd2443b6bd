//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (ready to serve traffic)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// GET /health/live
///
/// Kubernetes liveness probe.
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 once the session snapshot is in place, 503 before.
pub async fn readiness(State(state): State<Arc<AppState>>) -> ApiResult<StatusCode> {
    if snapshot_ready(&state) {
        Ok(StatusCode::OK)
    } else {
        Err(ApiError::ServiceUnavailable("session snapshot not generated".to_string()))
    }
}

/// GET /health
///
/// Full health status with component details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let ws_connections = state.ws_connection_count().await;
    let hub_has_room = ws_connections < state.config.websocket.max_connections;
    let feed_ok = snapshot_ready(&state);

    let status = if feed_ok && hub_has_room {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        feed: if feed_ok { "ok" } else { "error" }.to_string(),
        ws_connections,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn snapshot_ready(state: &AppState) -> bool {
    !state.snapshot.opportunities.is_empty() && !state.snapshot.bridge_flows.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::market::Snapshot;
    use crate::telemetry::StatsFeed;
    use axum::response::IntoResponse;

    fn empty_state() -> Arc<AppState> {
        let snapshot = Snapshot {
            opportunities: Vec::new(),
            bridge_flows: Vec::new(),
            network_loads: Vec::new(),
            generated_at: 0,
        };
        Arc::new(AppState::new(Config::default(), snapshot, StatsFeed::default()))
    }

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_without_snapshot() {
        let result = readiness(State(empty_state())).await;
        assert!(matches!(result, Err(ApiError::ServiceUnavailable(_))));

        let response = result.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_full_health_degraded_without_snapshot() {
        let Json(health) = full_health(State(empty_state())).await;
        assert_eq!(health.status, "degraded");
        assert_eq!(health.feed, "error");
    }
}
