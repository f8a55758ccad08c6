//! Wire protocol: JSON event envelopes and frame dispatch.
//!
//! Every frame is one JSON object `{"event": "<name>", "data": {...}}`.
//! Payload fields are optional at this boundary; a missing field silently
//! skips the dependent effect in the engine rather than raising an error.

use serde::{Deserialize, Serialize};

use crate::chat::RoomToken;
use crate::state::AppState;
use crate::ws::{broadcast, ConnectionId};

/// The `send_message` payload, relayed to the room in full as
/// `receive_message`. `index` is the sender's own message-list position,
/// treated as an opaque correlation token; `timestamp` is client-rendered
/// and passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<RoomToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Events clients send. Transport connect/disconnect are not frames; they
/// arrive through the actor lifecycle.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    JoinRoom {
        #[serde(default)]
        room: Option<RoomToken>,
        #[serde(default)]
        username: Option<String>,
    },
    SendMessage(MessagePayload),
    MessageReceived {
        #[serde(default)]
        index: Option<u64>,
        #[serde(default)]
        room: Option<RoomToken>,
    },
    RejoinRoom {
        #[serde(default)]
        room: Option<RoomToken>,
        #[serde(default)]
        username: Option<String>,
    },
}

/// Events the server emits. `Connected` is the transport hello carrying the
/// session's connection id; the rest are chat events per the room engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    Connected { id: String },
    UserJoined { username: String },
    UserOnline { username: String },
    UserOffline { username: String },
    ReceiveMessage(MessagePayload),
    MessageRead { index: u64, recipient: String },
}

/// Handle one incoming text frame: decode, run through the engine, fan out.
/// Malformed frames are logged and dropped; nothing here is fatal.
pub fn handle_text_frame(text: &str, conn: ConnectionId, state: &AppState) {
    let event: ClientEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(
                conn_id = %conn,
                error = %e,
                "failed to decode event frame, dropping"
            );
            return;
        }
    };

    let deliveries = state.engine.handle(conn, event);
    broadcast::deliver(&state.senders, &deliveries);
}
