//! Fan-out of resolved deliveries over the sender registry.
//!
//! Delivery is fire-and-forget: a send failure means the receiver task is
//! gone and its connection is mid-teardown, so the message is dropped and
//! the remaining recipients still get theirs.

use axum::extract::ws::Message;

use crate::chat::Delivery;
use crate::ws::protocol::ServerEvent;
use crate::ws::{ConnectionId, SenderRegistry};

/// Send every delivery to its resolved targets.
pub fn deliver(senders: &SenderRegistry, deliveries: &[Delivery]) {
    for delivery in deliveries {
        let Some(msg) = encode(&delivery.event) else {
            continue;
        };
        for conn in &delivery.targets {
            if let Some(tx) = senders.get(conn) {
                let _ = tx.send(msg.clone());
            }
        }
    }
}

/// Send one event to a single connection (the `connected` hello).
pub fn send_to(senders: &SenderRegistry, conn: ConnectionId, event: &ServerEvent) {
    let Some(msg) = encode(event) else { return };
    if let Some(tx) = senders.get(&conn) {
        let _ = tx.send(msg);
    }
}

fn encode(event: &ServerEvent) -> Option<Message> {
    match serde_json::to_string(event) {
        Ok(text) => Some(Message::Text(text.into())),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode server event");
            None
        }
    }
}
