//! Dashboard Routes
//!
//! Read-only views of the session snapshot and the live statistics.
//!
//! - GET /api/v1/snapshot - Whole record set
//! - GET /api/v1/opportunities - Opportunities, highest spread first
//! - GET /api/v1/opportunities/top - Top performers
//! - GET /api/v1/bridges - Bridge flows, one per chain
//! - GET /api/v1/network - Network load panel
//! - GET /api/v1/stats - Current headline statistics

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::api::dto::{
    BridgeFlowListResponse, BridgeFlowResponse, NetworkResponse, OpportunityListParams,
    OpportunityListResponse, StatsResponse, TopPerformersParams, DEFAULT_TOP_COUNT,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::market::Snapshot;

/// GET /api/v1/snapshot
pub async fn get_snapshot(State(state): State<Arc<AppState>>) -> Json<Snapshot> {
    Json(state.snapshot.as_ref().clone())
}

/// GET /api/v1/opportunities?limit=
///
/// Without a limit every opportunity is returned. A limit above the
/// number of opportunities returns them all.
pub async fn list_opportunities(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OpportunityListParams>,
) -> ApiResult<Json<OpportunityListResponse>> {
    let opportunities = &state.snapshot.opportunities;

    let limit = match params.limit {
        Some(0) => {
            return Err(ApiError::Validation(
                "limit must be at least 1".to_string(),
            ))
        }
        Some(limit) => limit,
        None => opportunities.len(),
    };

    Ok(Json(OpportunityListResponse::new(
        state.snapshot.top_performers(limit),
    )))
}

/// GET /api/v1/opportunities/top?count=
///
/// The `count` highest-spread opportunities, 5 by default.
pub async fn top_performers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TopPerformersParams>,
) -> ApiResult<Json<OpportunityListResponse>> {
    let count = params.count.unwrap_or(DEFAULT_TOP_COUNT);
    if count == 0 {
        return Err(ApiError::Validation("count must be at least 1".to_string()));
    }

    Ok(Json(OpportunityListResponse::new(
        state.snapshot.top_performers(count),
    )))
}

/// GET /api/v1/bridges
pub async fn list_bridges(State(state): State<Arc<AppState>>) -> Json<BridgeFlowListResponse> {
    let flows: Vec<BridgeFlowResponse> = state
        .snapshot
        .bridge_flows
        .iter()
        .map(BridgeFlowResponse::from)
        .collect();

    Json(BridgeFlowListResponse {
        total: flows.len(),
        flows,
    })
}

/// GET /api/v1/network
pub async fn network_loads(State(state): State<Arc<AppState>>) -> Json<NetworkResponse> {
    Json(NetworkResponse {
        loads: state.snapshot.network_loads.clone(),
    })
}

/// GET /api/v1/stats
pub async fn current_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(StatsResponse::new(
        &state.stats.current(),
        Utc::now().timestamp_millis(),
    ))
}
