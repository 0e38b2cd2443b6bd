//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::market::{BridgeFlow, ChainInfo, ChainLoad, Opportunity};
use crate::telemetry::{AggregateStats, StatsDisplay};

/// Default number of top performers
pub const DEFAULT_TOP_COUNT: usize = 5;

// ============================================
// MARKET DTOs
// ============================================

/// Query parameters for the opportunity list
#[derive(Debug, Default, Deserialize)]
pub struct OpportunityListParams {
    /// Maximum number of opportunities, highest spread first
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Query parameters for top performers
#[derive(Debug, Default, Deserialize)]
pub struct TopPerformersParams {
    #[serde(default)]
    pub count: Option<usize>,
}

/// Display attributes of a record's chain
#[derive(Debug, Serialize)]
pub struct ChainBadge {
    pub badge: &'static str,
    pub color: &'static str,
}

impl From<&ChainInfo> for ChainBadge {
    fn from(info: &ChainInfo) -> Self {
        Self {
            badge: info.badge(),
            color: info.color,
        }
    }
}

/// Opportunity with its display attributes
#[derive(Debug, Serialize)]
pub struct OpportunityResponse {
    #[serde(flatten)]
    pub opportunity: Opportunity,
    pub chain: ChainBadge,
    pub risk_color: &'static str,
}

impl From<&Opportunity> for OpportunityResponse {
    fn from(opportunity: &Opportunity) -> Self {
        Self {
            chain: opportunity.chain_info().into(),
            risk_color: opportunity.risk.color(),
            opportunity: opportunity.clone(),
        }
    }
}

/// Opportunity list response
#[derive(Debug, Serialize)]
pub struct OpportunityListResponse {
    pub opportunities: Vec<OpportunityResponse>,
    /// Number of opportunities returned
    pub total: usize,
}

impl OpportunityListResponse {
    pub fn new(opportunities: &[Opportunity]) -> Self {
        Self {
            opportunities: opportunities.iter().map(OpportunityResponse::from).collect(),
            total: opportunities.len(),
        }
    }
}

/// Bridge flow with its display attributes
#[derive(Debug, Serialize)]
pub struct BridgeFlowResponse {
    #[serde(flatten)]
    pub flow: BridgeFlow,
    pub chain: ChainBadge,
    pub status_color: &'static str,
}

impl From<&BridgeFlow> for BridgeFlowResponse {
    fn from(flow: &BridgeFlow) -> Self {
        Self {
            chain: flow.from.info().into(),
            status_color: flow.status.color(),
            flow: flow.clone(),
        }
    }
}

/// Bridge flow list response
#[derive(Debug, Serialize)]
pub struct BridgeFlowListResponse {
    pub flows: Vec<BridgeFlowResponse>,
    pub total: usize,
}

/// Network load panel response
#[derive(Debug, Serialize)]
pub struct NetworkResponse {
    pub loads: Vec<ChainLoad>,
}

// ============================================
// STATS DTOs
// ============================================

/// Current headline statistics
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_volume: f64,
    pub active_convergences: i64,
    pub avg_spread: f64,
    /// Formatted for the stat cards
    pub display: StatsDisplay,
    /// Timestamp in milliseconds
    pub timestamp: i64,
}

impl StatsResponse {
    pub fn new(stats: &AggregateStats, timestamp: i64) -> Self {
        Self {
            total_volume: stats.total_volume,
            active_convergences: stats.active_convergences,
            avg_spread: stats.avg_spread,
            display: stats.display(),
            timestamp,
        }
    }
}

// ============================================
// CHAIN DTOs
// ============================================

/// Chain lookup entry
#[derive(Debug, Serialize, Deserialize)]
pub struct ChainResponse {
    pub name: String,
    pub abbr: String,
    pub color: String,
    pub badge: String,
}

impl From<&ChainInfo> for ChainResponse {
    fn from(info: &ChainInfo) -> Self {
        Self {
            name: info.name.to_string(),
            abbr: info.abbr.to_string(),
            color: info.color.to_string(),
            badge: info.badge().to_string(),
        }
    }
}

/// Chain table response
#[derive(Debug, Serialize, Deserialize)]
pub struct ChainListResponse {
    pub chains: Vec<ChainResponse>,
    pub total: usize,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,
    /// "ok" while the statistics feed has a live writer
    pub feed: String,
    pub ws_connections: usize,
    pub uptime_seconds: u64,
    pub version: String,
}
