//! # CLAIRON
//!
//! Simulated cross-chain convergence feed behind the CLAIRON dashboard.
//!
//! ## Features
//!
//! - **Synthetic market data**: Ranked opportunities, bridge flows and network load per session
//! - **Live statistics**: Floored random walk on a fixed cadence
//! - **Smooth display values**: Exponential easing of every headline number
//! - **Real-time**: WebSocket feed for live dashboards
//!
//! ## Modules
//!
//! - [`market`]: Records, chain table and snapshot generation
//! - [`telemetry`]: Aggregate statistics, the live mutator and display animators
//! - [`websocket`]: Connection hub and live feed protocol
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clairon::market::{RngSource, Snapshot};
//! use clairon::telemetry::{spawn_all, LiveMutator, StatsFeed, DEFAULT_SMOOTHING_INTERVAL};
//!
//! #[tokio::main]
//! async fn main() {
//!     let snapshot = Snapshot::generate(&mut RngSource::seeded(7));
//!     println!("Best spread: {:.1}%", snapshot.opportunities[0].spread);
//!
//!     let feed = StatsFeed::default();
//!     let mutator = LiveMutator::new(feed.clone(), Box::new(RngSource::seeded(7))).start();
//!     let animators = spawn_all(&feed.subscribe(), DEFAULT_SMOOTHING_INTERVAL, None);
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(6)).await;
//!     println!("{:?}", feed.current().display());
//!
//!     mutator.stop().await;
//!     for animator in animators {
//!         animator.stop().await;
//!     }
//! }
//! ```

pub mod api;
pub mod config;
pub mod market;
pub mod telemetry;
pub mod websocket;

// Re-export top-level types for convenience
pub use market::{
    BridgeFlow, Chain, ChainInfo, ChainLoad, FlowStatus, Opportunity, RandomSource, RiskTier,
    RngSource, Snapshot,
};

pub use telemetry::{
    AggregateStats, AnimatorHandle, DisplayAnimator, LiveMutator, MutatorHandle, SmoothedValue,
    StatMetric, StatsFeed,
};

pub use api::{build_router, serve, ApiError, AppState};

pub use websocket::{
    websocket_handler, ClientMessage, ConnectionHub, HubConfig, HubError, ServerMessage, WsEvent,
};

pub use config::{Config, ConfigError, LoadedConfig, LoggingConfig, SimulationConfig};
