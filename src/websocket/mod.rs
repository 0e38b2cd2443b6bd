//! WebSocket Live Feed
//!
//! Streams the simulated feed to dashboard clients.
//!
//! ## Architecture
//!
//! - **ConnectionHub**: Manages all active connections and subscriptions
//! - **Handler**: Handles WebSocket upgrade and message processing
//! - **Messages**: Defines client and server message formats
//!
//! ## Usage
//!
//! Clients connect to `/api/v1/ws` and can subscribe to topics:
//! - `stats` - Every random-walk tick of the headline statistics
//! - `display.*` - All smoothed display values
//! - `display.{metric}` - One smoothed value (e.g., `display.avg_spread`)
//! - `snapshot` - The session record set
//! - `system` - Lifecycle notices
//!
//! ## Example
//!
//! ```javascript
//! const ws = new WebSocket('ws://localhost:8082/api/v1/ws');
//!
//! ws.onopen = () => {
//!   ws.send(JSON.stringify({type: 'subscribe', topics: ['stats', 'display.*']}));
//!   ws.send(JSON.stringify({type: 'snapshot'}));
//! };
//! ```

mod handler;
mod hub;
mod messages;

pub use handler::websocket_handler;
pub use hub::{is_valid_topic, ConnectionHub, ConnectionId, HubConfig, HubError};
pub use messages::{ClientMessage, ServerMessage, WsEvent};
