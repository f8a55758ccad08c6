pub mod actor;
pub mod broadcast;
pub mod handler;
pub mod protocol;

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Opaque per-session handle issued on upgrade, stable for the session's
/// lifetime. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Type alias for the sender half of a WebSocket connection's channel.
/// Other parts of the system can clone this to push messages to a specific client.
pub type ConnectionSender = mpsc::UnboundedSender<axum::extract::ws::Message>;

/// Sender registry: the outbound channel for every live connection.
/// Arc<DashMap<ConnectionId, ConnectionSender>>
pub type SenderRegistry = Arc<DashMap<ConnectionId, ConnectionSender>>;

/// Create a new empty sender registry.
pub fn new_sender_registry() -> SenderRegistry {
    Arc::new(DashMap::new())
}
