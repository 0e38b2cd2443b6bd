//! WebSocket Message Types
//!
//! Defines all message types exchanged between dashboards and the CLAIRON
//! feed.

use serde::{Deserialize, Serialize};

use crate::market::{BridgeFlow, ChainLoad, Opportunity, Snapshot};
use crate::telemetry::{AggregateStats, StatMetric};

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Subscribe to topics for real-time updates
    Subscribe {
        /// Topics to subscribe to (e.g., "stats", "display.*")
        topics: Vec<String>,
    },
    /// Unsubscribe from topics
    Unsubscribe {
        topics: Vec<String>,
    },
    /// Request the session snapshot
    Snapshot,
    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established
    Connected {
        /// Unique connection identifier
        connection_id: String,
    },
    /// Subscription confirmed
    Subscribed {
        topics: Vec<String>,
    },
    /// Unsubscription confirmed
    Unsubscribed {
        topics: Vec<String>,
    },
    /// The aggregate statistics after a mutator tick
    Stats {
        total_volume: f64,
        active_convergences: i64,
        avg_spread: f64,
        /// Timestamp in milliseconds
        timestamp: i64,
    },
    /// A smoothed value for one headline metric
    Display {
        metric: StatMetric,
        value: f64,
        /// Value rounded for display
        formatted: String,
    },
    /// The session record set
    Snapshot {
        opportunities: Vec<Opportunity>,
        bridge_flows: Vec<BridgeFlow>,
        network_loads: Vec<ChainLoad>,
        generated_at: i64,
    },
    /// Lifecycle notice
    System {
        message: String,
    },
    /// Pong response to ping
    Pong,
    /// Error message
    Error {
        message: String,
    },
}

impl ServerMessage {
    pub fn snapshot(snapshot: &Snapshot) -> Self {
        ServerMessage::Snapshot {
            opportunities: snapshot.opportunities.clone(),
            bridge_flows: snapshot.bridge_flows.clone(),
            network_loads: snapshot.network_loads.clone(),
            generated_at: snapshot.generated_at,
        }
    }
}

/// Internal event for broadcasting through the hub
#[derive(Debug, Clone)]
pub struct WsEvent {
    /// Topic this event belongs to (e.g., "display.avg_spread")
    pub topic: String,
    /// The message to send to subscribers
    pub message: ServerMessage,
}

impl WsEvent {
    /// Create a stats event from a mutator tick
    pub fn stats(stats: &AggregateStats, timestamp: i64) -> Self {
        Self {
            topic: "stats".to_string(),
            message: ServerMessage::Stats {
                total_volume: stats.total_volume,
                active_convergences: stats.active_convergences,
                avg_spread: stats.avg_spread,
                timestamp,
            },
        }
    }

    /// Create a display event for one smoothed metric
    pub fn display(metric: StatMetric, value: f64) -> Self {
        Self {
            topic: format!("display.{}", metric),
            message: ServerMessage::Display {
                metric,
                value,
                formatted: format!("{:.*}", metric.decimals(), value),
            },
        }
    }

    /// Create a system event
    pub fn system(message: &str) -> Self {
        Self {
            topic: "system".to_string(),
            message: ServerMessage::System {
                message: message.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_deserialize_subscribe() {
        let json = r#"{"type": "subscribe", "topics": ["stats", "display.*"]}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        match msg {
            ClientMessage::Subscribe { topics } => {
                assert_eq!(topics.len(), 2);
                assert_eq!(topics[0], "stats");
            }
            _ => panic!("Expected Subscribe"),
        }
    }

    #[test]
    fn test_client_message_deserialize_unit_variants() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type": "ping"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));

        let msg: ClientMessage = serde_json::from_str(r#"{"type": "snapshot"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Snapshot));
    }

    #[test]
    fn test_server_message_serialize_stats() {
        let event = WsEvent::stats(&AggregateStats::default(), 1699000000000);
        assert_eq!(event.topic, "stats");

        let json = serde_json::to_string(&event.message).unwrap();
        assert!(json.contains("\"type\":\"stats\""));
        assert!(json.contains("\"active_convergences\":156"));
        assert!(json.contains("\"avg_spread\":12.4"));
    }

    #[test]
    fn test_display_event() {
        let event = WsEvent::display(StatMetric::AvgSpread, 12.437);
        assert_eq!(event.topic, "display.avg_spread");

        let json = serde_json::to_string(&event.message).unwrap();
        assert!(json.contains("\"type\":\"display\""));
        assert!(json.contains("\"metric\":\"avg_spread\""));
        assert!(json.contains("\"formatted\":\"12.4\""));
    }

    #[test]
    fn test_server_message_serialize_connected() {
        let msg = ServerMessage::Connected {
            connection_id: "abc-123".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"connected\""));
        assert!(json.contains("\"connection_id\":\"abc-123\""));
    }

    #[test]
    fn test_system_event() {
        let event = WsEvent::system("feed stopped");
        assert_eq!(event.topic, "system");
        assert!(matches!(event.message, ServerMessage::System { .. }));
    }
}
