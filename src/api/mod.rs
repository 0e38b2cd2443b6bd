//! CLAIRON REST API
//!
//! HTTP API layer for the CLAIRON feed, built with Axum.
//!
//! # Endpoints
//!
//! ## Dashboard
//! - `GET /api/v1/snapshot` - Session record set
//! - `GET /api/v1/opportunities?limit=` - Opportunities, highest spread first
//! - `GET /api/v1/opportunities/top?count=` - Top performers (default 5)
//! - `GET /api/v1/bridges` - Bridge flows
//! - `GET /api/v1/network` - Network load panel
//! - `GET /api/v1/stats` - Current headline statistics
//!
//! ## Chains
//! - `GET /api/v1/chains` - Chain table
//! - `GET /api/v1/chains/:name` - One chain (404 when unknown)
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! ## WebSocket
//! - `GET /api/v1/ws` - Live feed connection
//!
//! # Example
//!
//! ```rust,no_run
//! use clairon::api::{serve, AppState};
//! use clairon::config::Config;
//! use clairon::market::{RngSource, Snapshot};
//! use clairon::telemetry::StatsFeed;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let snapshot = Snapshot::generate(&mut RngSource::from_entropy());
//!     let stats = StatsFeed::new(config.simulation.initial_stats());
//!
//!     let state = AppState::new(config, snapshot, stats);
//!     serve(state).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{http::HeaderValue, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::websocket::websocket_handler;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/snapshot", get(routes::dashboard::get_snapshot))
        .route("/opportunities", get(routes::dashboard::list_opportunities))
        .route("/opportunities/top", get(routes::dashboard::top_performers))
        .route("/bridges", get(routes::dashboard::list_bridges))
        .route("/network", get(routes::dashboard::network_loads))
        .route("/stats", get(routes::dashboard::current_stats))
        .route("/chains", get(routes::chains::list_chains))
        .route("/chains/:name", get(routes::chains::get_chain))
        .route("/ws", get(websocket_handler));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.api.cors_origins);
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Permissive without configured origins, otherwise limited to them
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

/// Start the API server
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let addr = state.config.api.addr();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("CLAIRON API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("CLAIRON API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
