//! WebSocket Connection Hub
//!
//! Tracks dashboard connections and their topic subscriptions, and fans
//! feed events out to subscribers. Topic names:
//! - `stats`: every mutator tick
//! - `display.{metric}` / `display.*`: smoothed headline values
//! - `snapshot`: the session record set
//! - `system`: lifecycle notices

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Weak};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, RwLock};
use uuid::Uuid;

use super::messages::{ServerMessage, WsEvent};
use crate::telemetry::StatMetric;

/// Unique identifier for a WebSocket connection
pub type ConnectionId = String;

/// Manages all WebSocket connections and subscriptions
///
/// Cloning yields another handle onto the same connection registry.
#[derive(Clone)]
pub struct ConnectionHub {
    inner: Arc<HubInner>,
}

struct HubInner {
    /// ConnectionId → ConnectionHandle
    connections: RwLock<HashMap<ConnectionId, ConnectionHandle>>,
    /// Topic → subscribed ConnectionIds
    subscriptions: RwLock<HashMap<String, HashSet<ConnectionId>>>,
    /// Tap for in-process listeners
    events: broadcast::Sender<WsEvent>,
    /// Queue drained in order by the dispatch task
    dispatch: mpsc::UnboundedSender<WsEvent>,
    config: HubConfig,
}

/// Configuration for the connection hub
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Maximum number of concurrent connections
    pub max_connections: usize,
    /// Capacity of the in-process event channel
    pub broadcast_capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_connections: 1000,
            broadcast_capacity: 1024,
        }
    }
}

/// Handle for sending messages to a specific connection
pub struct ConnectionHandle {
    pub sender: mpsc::UnboundedSender<ServerMessage>,
    /// Topics this connection is subscribed to
    pub subscriptions: HashSet<String>,
}

impl ConnectionHub {
    /// Create a hub and spawn its dispatch task
    ///
    /// Must be called from within a Tokio runtime. The dispatch task exits
    /// once the last handle onto the hub is dropped.
    pub fn new(config: HubConfig) -> Self {
        let (events, _) = broadcast::channel(config.broadcast_capacity.max(1));
        let (dispatch, queue) = mpsc::unbounded_channel();

        let inner = Arc::new(HubInner {
            connections: RwLock::new(HashMap::new()),
            subscriptions: RwLock::new(HashMap::new()),
            events,
            dispatch,
            config,
        });
        tokio::spawn(dispatch_events(Arc::downgrade(&inner), queue));

        Self { inner }
    }

    /// Register a new WebSocket connection
    ///
    /// Fails once the connection limit has been reached.
    pub async fn register(
        &self,
        sender: mpsc::UnboundedSender<ServerMessage>,
    ) -> Result<ConnectionId, HubError> {
        let mut connections = self.inner.connections.write().await;
        if connections.len() >= self.inner.config.max_connections {
            return Err(HubError::TooManyConnections(self.inner.config.max_connections));
        }

        let id = Uuid::new_v4().to_string();
        connections.insert(
            id.clone(),
            ConnectionHandle {
                sender,
                subscriptions: HashSet::new(),
            },
        );

        tracing::info!(connection_id = %id, "WebSocket connected");
        Ok(id)
    }

    /// Unregister a connection and clean up its subscriptions
    pub async fn unregister(&self, id: &str) {
        let handle = self.inner.connections.write().await.remove(id);

        if let Some(handle) = handle {
            let mut subs = self.inner.subscriptions.write().await;
            for topic in handle.subscriptions {
                if let Some(subscribers) = subs.get_mut(&topic) {
                    subscribers.remove(id);
                    if subscribers.is_empty() {
                        subs.remove(&topic);
                    }
                }
            }
        }

        tracing::info!(connection_id = %id, "WebSocket disconnected");
    }

    /// Subscribe a connection to topics; invalid topics are skipped
    pub async fn subscribe(&self, id: &str, topics: Vec<String>) -> Result<Vec<String>, HubError> {
        let mut connections = self.inner.connections.write().await;
        let handle = connections.get_mut(id).ok_or(HubError::ConnectionNotFound)?;

        let mut subs = self.inner.subscriptions.write().await;
        let mut subscribed = Vec::new();

        for topic in topics {
            if !is_valid_topic(&topic) {
                tracing::warn!(topic = %topic, "Invalid topic ignored");
                continue;
            }

            handle.subscriptions.insert(topic.clone());
            subs.entry(topic.clone()).or_default().insert(id.to_string());
            subscribed.push(topic);
        }

        tracing::debug!(connection_id = %id, topics = ?subscribed, "Subscribed to topics");
        Ok(subscribed)
    }

    /// Unsubscribe a connection from topics
    pub async fn unsubscribe(
        &self,
        id: &str,
        topics: Vec<String>,
    ) -> Result<Vec<String>, HubError> {
        let mut connections = self.inner.connections.write().await;
        let handle = connections.get_mut(id).ok_or(HubError::ConnectionNotFound)?;

        let mut subs = self.inner.subscriptions.write().await;
        let mut unsubscribed = Vec::new();

        for topic in topics {
            if handle.subscriptions.remove(&topic) {
                if let Some(subscribers) = subs.get_mut(&topic) {
                    subscribers.remove(id);
                    if subscribers.is_empty() {
                        subs.remove(&topic);
                    }
                }
                unsubscribed.push(topic);
            }
        }

        tracing::debug!(connection_id = %id, topics = ?unsubscribed, "Unsubscribed from topics");
        Ok(unsubscribed)
    }

    /// Deliver an event to every subscriber of its topic
    ///
    /// A subscription to `prefix.*` matches every `prefix.{name}` topic.
    /// Returns the number of connections reached.
    pub async fn broadcast(&self, event: &WsEvent) -> usize {
        // Same lock order as subscribe/unsubscribe
        let connections = self.inner.connections.read().await;
        let subs = self.inner.subscriptions.read().await;

        let mut recipients: HashSet<&ConnectionId> = HashSet::new();
        if let Some(ids) = subs.get(&event.topic) {
            recipients.extend(ids);
        }
        if let Some((prefix, _)) = event.topic.split_once('.') {
            if let Some(ids) = subs.get(&format!("{}.*", prefix)) {
                recipients.extend(ids);
            }
        }

        let mut sent = 0;
        for id in recipients {
            if let Some(handle) = connections.get(id) {
                if handle.sender.send(event.message.clone()).is_ok() {
                    sent += 1;
                }
            }
        }

        if sent > 0 {
            tracing::trace!(topic = %event.topic, subscribers = sent, "Broadcast event");
        }
        sent
    }

    /// Publish an event without waiting for delivery
    ///
    /// Feeds in-process listeners and queues the fan-out to subscribers.
    /// Events reach each connection in publish order.
    pub fn publish(&self, event: WsEvent) {
        let _ = self.inner.events.send(event.clone());

        if self.inner.dispatch.send(event).is_err() {
            tracing::warn!("Hub dispatch task has stopped, event dropped");
        }
    }

    /// Send a message directly to one connection
    pub async fn send_to(&self, id: &str, message: ServerMessage) -> Result<(), HubError> {
        let connections = self.inner.connections.read().await;
        let handle = connections.get(id).ok_or(HubError::ConnectionNotFound)?;

        handle.sender.send(message).map_err(|_| HubError::SendFailed)
    }

    /// Receiver of every published event
    pub fn subscribe_events(&self) -> broadcast::Receiver<WsEvent> {
        self.inner.events.subscribe()
    }

    pub async fn connection_count(&self) -> usize {
        self.inner.connections.read().await.len()
    }

    /// Number of connections subscribed to exactly `topic`
    pub async fn subscription_count(&self, topic: &str) -> usize {
        self.inner
            .subscriptions
            .read()
            .await
            .get(topic)
            .map(|s| s.len())
            .unwrap_or(0)
    }
}

/// Fan queued events out one at a time
///
/// Holds only a weak reference so the hub can drop; the queue then closes.
async fn dispatch_events(hub: Weak<HubInner>, mut queue: mpsc::UnboundedReceiver<WsEvent>) {
    while let Some(event) = queue.recv().await {
        let Some(inner) = hub.upgrade() else {
            break;
        };
        ConnectionHub { inner }.broadcast(&event).await;
    }

    tracing::debug!("Hub dispatch task finished");
}

/// Check whether a topic can be subscribed to
pub fn is_valid_topic(topic: &str) -> bool {
    match topic.split_once('.') {
        Some(("display", "*")) => true,
        Some(("display", metric)) => metric.parse::<StatMetric>().is_ok(),
        Some(_) => false,
        None => matches!(topic, "stats" | "snapshot" | "system"),
    }
}

/// Errors that can occur in the connection hub
#[derive(Debug, Error)]
pub enum HubError {
    #[error("Too many connections (limit: {0})")]
    TooManyConnections(usize),

    #[error("Connection not found")]
    ConnectionNotFound,

    #[error("Failed to send message")]
    SendFailed,
}
