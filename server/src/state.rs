use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::chat::engine::RoomEngine;
use crate::ws::{self, ConnectionId, SenderRegistry};

/// Shared application state passed to all handlers via axum State extractor.
#[derive(Clone)]
pub struct AppState {
    /// The room engine: all chat state behind one lock
    pub engine: Arc<RoomEngine>,
    /// Outbound mpsc sender per live WebSocket connection
    pub senders: SenderRegistry,
    /// Allowed cross-origin caller, reported on /api/info
    pub allowed_origin: String,
    /// Monotonic connection id source
    next_conn_id: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(allowed_origin: impl Into<String>) -> Self {
        Self {
            engine: Arc::new(RoomEngine::new()),
            senders: ws::new_sender_registry(),
            allowed_origin: allowed_origin.into(),
            next_conn_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Issue the next connection id. Ids are process-unique and never reused.
    pub fn next_connection_id(&self) -> ConnectionId {
        ConnectionId::new(self.next_conn_id.fetch_add(1, Ordering::Relaxed))
    }
}
