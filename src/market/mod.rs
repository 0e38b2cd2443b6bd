//! CLAIRON Market Data
//!
//! This module provides the synthetic record set behind the dashboard:
//!
//! - **types**: Core records (Opportunity, BridgeFlow, ChainLoad) and the chain table
//! - **random**: Injectable random sources
//! - **generator**: Snapshot generation
//!
//! # Example
//!
//! ```rust
//! use clairon::market::{RngSource, Snapshot};
//!
//! let mut rng = RngSource::seeded(42);
//! let snapshot = Snapshot::generate(&mut rng);
//!
//! assert_eq!(snapshot.opportunities.len(), 12);
//! assert_eq!(snapshot.bridge_flows.len(), 6);
//! ```

pub mod generator;
pub mod random;
pub mod types;

pub use generator::{
    generate_bridge_flows, generate_network_loads, generate_opportunities, Snapshot,
    NETWORK_LOAD_CHAINS, OPPORTUNITY_COUNT,
};
pub use random::{RandomSource, RngSource, SequenceSource};
pub use types::{
    lookup_chain, BridgeFlow, Chain, ChainInfo, ChainLoad, FlowStatus, Opportunity, RiskTier,
    BET_POOL, CHAINS, TARGET_MARKET,
};
