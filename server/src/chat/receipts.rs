//! Read-receipt correlation.
//!
//! A recipient reporting `message_received {index, room}` is relayed back to
//! the rest of the room as `message_read {index, recipient}`. The index is an
//! opaque correlation token assigned by the sending client; the server never
//! validates it. No dedup: N reporters produce N relays for the same index.

use super::registry::Registry;
use super::{Delivery, RoomToken};
use crate::ws::protocol::ServerEvent;
use crate::ws::ConnectionId;

/// Build the `message_read` relay for one receipt report. Targets everyone
/// currently in the room except the reporter; `None` when nobody is left to
/// tell (or the room is unknown).
pub fn correlate(
    registry: &Registry,
    room: &RoomToken,
    index: u64,
    reporter: ConnectionId,
) -> Option<Delivery> {
    let targets: Vec<ConnectionId> = registry
        .members_of(room)
        .into_iter()
        .filter(|&conn| conn != reporter)
        .collect();

    if targets.is_empty() {
        return None;
    }

    Some(Delivery {
        targets,
        event: ServerEvent::MessageRead {
            index,
            recipient: reporter.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(raw: u64) -> ConnectionId {
        ConnectionId::new(raw)
    }

    #[test]
    fn relay_excludes_reporter() {
        let mut reg = Registry::new();
        let room = RoomToken::from("42");
        reg.set_identity(conn(1), "alice", &room);
        reg.set_identity(conn(2), "bob", &room);
        reg.set_identity(conn(3), "carol", &room);

        let delivery = correlate(&reg, &room, 7, conn(2)).unwrap();
        assert_eq!(delivery.targets.len(), 2);
        assert!(!delivery.targets.contains(&conn(2)));
        match delivery.event {
            ServerEvent::MessageRead { index, ref recipient } => {
                assert_eq!(index, 7);
                assert_eq!(recipient, &conn(2).to_string());
            }
            ref other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn lone_reporter_yields_nothing() {
        let mut reg = Registry::new();
        let room = RoomToken::from("42");
        reg.set_identity(conn(1), "alice", &room);
        assert!(correlate(&reg, &room, 0, conn(1)).is_none());
    }

    #[test]
    fn unknown_room_yields_nothing() {
        let reg = Registry::new();
        assert!(correlate(&reg, &RoomToken::from("nope"), 0, conn(1)).is_none());
    }
}
