//! Room chat core: registry, presence, receipts, and the event engine.
//!
//! All shared mutable chat state lives inside [`engine::RoomEngine`] behind a
//! single mutex. The WebSocket layer feeds it typed client events and fans
//! out the resulting deliveries; nothing in this module touches a socket.

pub mod engine;
pub mod presence;
pub mod receipts;
pub mod registry;

use serde::{Deserialize, Deserializer, Serialize};

use crate::ws::protocol::ServerEvent;
use crate::ws::ConnectionId;

/// Room identifier as supplied by clients. Rooms exist implicitly: joining a
/// token creates the room, the last member leaving destroys it.
///
/// Clients send the token as either a JSON string or a number (`"42"` and
/// `42` name the same room), so deserialization accepts both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RoomToken(String);

impl RoomToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomToken {
    fn from(s: &str) -> Self {
        RoomToken(s.to_string())
    }
}

impl std::fmt::Display for RoomToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for RoomToken {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => RoomToken(s),
            Raw::Number(n) => RoomToken(n.to_string()),
        })
    }
}

/// One outbound event resolved to its concrete recipients.
///
/// The engine computes the target list while holding its lock, so every
/// delivery sees a consistent snapshot of room membership. Sending happens
/// later, lock-free, in `ws::broadcast`.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub targets: Vec<ConnectionId>,
    pub event: ServerEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_token_accepts_string_and_number() {
        let from_str: RoomToken = serde_json::from_str("\"42\"").unwrap();
        let from_num: RoomToken = serde_json::from_str("42").unwrap();
        assert_eq!(from_str, from_num);
        assert_eq!(from_str.as_str(), "42");
    }

    #[test]
    fn room_token_serializes_as_string() {
        let token = RoomToken::from("lobby");
        assert_eq!(serde_json::to_string(&token).unwrap(), "\"lobby\"");
    }
}
