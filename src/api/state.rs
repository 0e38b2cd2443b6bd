//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::market::Snapshot;
use crate::telemetry::StatsFeed;
use crate::websocket::{ConnectionHub, ServerMessage, WsEvent};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Record set generated once for this session
    pub snapshot: Arc<Snapshot>,
    /// Live headline statistics
    pub stats: StatsFeed,
    pub config: Arc<Config>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
    /// WebSocket connection hub for the live feed
    pub ws_hub: ConnectionHub,
}

impl AppState {
    /// Create state with a hub sized from the websocket config
    pub fn new(config: Config, snapshot: Snapshot, stats: StatsFeed) -> Self {
        let hub = ConnectionHub::new(config.websocket.hub_config());
        Self::with_hub(config, snapshot, stats, hub)
    }

    /// Create state around an existing hub shared with the feed tasks
    pub fn with_hub(
        config: Config,
        snapshot: Snapshot,
        stats: StatsFeed,
        ws_hub: ConnectionHub,
    ) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            stats,
            config: Arc::new(config),
            start_time: Instant::now(),
            ws_hub,
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Current statistics as a `stats` message
    pub fn stats_message(&self) -> ServerMessage {
        WsEvent::stats(&self.stats.current(), Utc::now().timestamp_millis()).message
    }

    /// Get WebSocket connection count
    pub async fn ws_connection_count(&self) -> usize {
        self.ws_hub.connection_count().await
    }
}
