//! Connection registry: maps live connections to display names and room
//! membership. Owned exclusively by the engine; every mutation here happens
//! under the engine's lock.

use std::collections::{HashMap, HashSet};

use super::RoomToken;
use crate::ws::ConnectionId;

/// Authoritative record of live connections, their identities, and room
/// membership. A connection is a member of a room iff it has joined or
/// rejoined that room and has not since disconnected.
#[derive(Debug, Default)]
pub struct Registry {
    /// Every connection the transport has registered, named or not.
    connections: HashSet<ConnectionId>,
    /// Display name per connection, set on first join/rejoin.
    names: HashMap<ConnectionId, String>,
    /// Room token -> member connections.
    rooms: HashMap<RoomToken, HashSet<ConnectionId>>,
    /// Reverse index: connection -> rooms it belongs to.
    memberships: HashMap<ConnectionId, HashSet<RoomToken>>,
    /// Connections whose `user_joined` announcement has already fired.
    /// Keyed by connection id so the announcement happens at most once per
    /// connection lifetime, however many rooms it joins.
    announced: HashSet<ConnectionId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fresh transport connection with no identity yet.
    pub fn register(&mut self, conn: ConnectionId) {
        self.connections.insert(conn);
    }

    /// Record or overwrite the display name for `conn` and add it to `room`.
    /// Idempotent for repeated joins of the same room. Returns `true` the
    /// first time this connection id is marked announced; the caller decides
    /// whether that warrants a `user_joined` broadcast.
    pub fn set_identity(&mut self, conn: ConnectionId, name: &str, room: &RoomToken) -> bool {
        self.connections.insert(conn);
        self.names.insert(conn, name.to_string());
        self.rooms.entry(room.clone()).or_default().insert(conn);
        self.memberships.entry(conn).or_default().insert(room.clone());
        self.announced.insert(conn)
    }

    /// Remove `conn` from every room it belongs to and drop its identity.
    /// Safe to call for an unknown id. Returns the display name the
    /// connection had recorded, if any.
    pub fn unregister(&mut self, conn: ConnectionId) -> Option<String> {
        if let Some(rooms) = self.memberships.remove(&conn) {
            for room in rooms {
                if let Some(members) = self.rooms.get_mut(&room) {
                    members.remove(&conn);
                    if members.is_empty() {
                        self.rooms.remove(&room);
                    }
                }
            }
        }
        self.connections.remove(&conn);
        self.announced.remove(&conn);
        self.names.remove(&conn)
    }

    pub fn identity_of(&self, conn: ConnectionId) -> Option<&str> {
        self.names.get(&conn).map(String::as_str)
    }

    /// Snapshot of current members of `room`. Empty vec for an unknown room.
    pub fn members_of(&self, room: &RoomToken) -> Vec<ConnectionId> {
        self.rooms
            .get(room)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Snapshot of every live connection, joined or not.
    pub fn all_connections(&self) -> Vec<ConnectionId> {
        self.connections.iter().copied().collect()
    }

    pub fn is_member(&self, room: &RoomToken, conn: ConnectionId) -> bool {
        self.rooms
            .get(room)
            .is_some_and(|members| members.contains(&conn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(raw: u64) -> ConnectionId {
        ConnectionId::new(raw)
    }

    #[test]
    fn membership_follows_lifecycle() {
        let mut reg = Registry::new();
        let room = RoomToken::from("42");

        reg.register(conn(1));
        assert!(!reg.is_member(&room, conn(1)));

        reg.set_identity(conn(1), "alice", &room);
        assert!(reg.is_member(&room, conn(1)));
        assert_eq!(reg.identity_of(conn(1)), Some("alice"));

        reg.unregister(conn(1));
        assert!(!reg.is_member(&room, conn(1)));
        assert_eq!(reg.identity_of(conn(1)), None);
    }

    #[test]
    fn announcement_fires_once_per_connection() {
        let mut reg = Registry::new();
        assert!(reg.set_identity(conn(1), "alice", &RoomToken::from("a")));
        assert!(!reg.set_identity(conn(1), "alice", &RoomToken::from("a")));
        assert!(!reg.set_identity(conn(1), "alice", &RoomToken::from("b")));
    }

    #[test]
    fn unregister_vacates_every_room() {
        let mut reg = Registry::new();
        let a = RoomToken::from("a");
        let b = RoomToken::from("b");
        reg.set_identity(conn(1), "alice", &a);
        reg.set_identity(conn(1), "alice", &b);
        reg.set_identity(conn(2), "bob", &a);

        assert_eq!(reg.unregister(conn(1)), Some("alice".to_string()));
        assert!(!reg.is_member(&a, conn(1)));
        assert!(!reg.is_member(&b, conn(1)));
        assert!(reg.is_member(&a, conn(2)));
    }

    #[test]
    fn unregister_unknown_is_noop() {
        let mut reg = Registry::new();
        assert_eq!(reg.unregister(conn(99)), None);
        // Twice in a row is fine too.
        reg.register(conn(1));
        assert_eq!(reg.unregister(conn(1)), None);
        assert_eq!(reg.unregister(conn(1)), None);
    }

    #[test]
    fn empty_room_disappears() {
        let mut reg = Registry::new();
        let room = RoomToken::from("ephemeral");
        reg.set_identity(conn(1), "alice", &room);
        reg.unregister(conn(1));
        assert!(reg.members_of(&room).is_empty());
    }
}
