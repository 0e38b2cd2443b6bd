//! Chain Routes
//!
//! - GET /api/v1/chains - The chain table in declaration order
//! - GET /api/v1/chains/:name - One chain by exact name

use axum::{extract::Path, Json};

use crate::api::dto::{ChainListResponse, ChainResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::market::{lookup_chain, CHAINS};

/// GET /api/v1/chains
pub async fn list_chains() -> Json<ChainListResponse> {
    let chains: Vec<ChainResponse> = CHAINS.iter().map(ChainResponse::from).collect();

    Json(ChainListResponse {
        total: chains.len(),
        chains,
    })
}

/// GET /api/v1/chains/:name
///
/// Names are matched exactly ("Ethereum", not "ethereum").
pub async fn get_chain(Path(name): Path<String>) -> ApiResult<Json<ChainResponse>> {
    let info =
        lookup_chain(&name).ok_or_else(|| ApiError::NotFound(format!("Unknown chain '{}'", name)))?;

    Ok(Json(ChainResponse::from(info)))
}
