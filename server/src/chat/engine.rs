//! The room engine: consumes typed client events, mutates registry and
//! presence state under one lock, and returns fully resolved deliveries.
//!
//! Serializing every mutation through a single mutex preserves the join-dedup
//! and membership invariants under concurrent joins/disconnects; recipient
//! lists are snapshotted before the lock is released, so no broadcast ever
//! observes a half-updated room. Everything here is in-memory and bounded —
//! no operation can block on I/O or fail the process.

use std::sync::Mutex;

use super::presence::{PresenceMap, PresenceStatus};
use super::receipts;
use super::registry::Registry;
use super::{Delivery, RoomToken};
use crate::ws::protocol::{ClientEvent, MessagePayload, ServerEvent};
use crate::ws::ConnectionId;

struct EngineInner {
    registry: Registry,
    presence: PresenceMap,
}

/// Coordinating component owning all shared chat state.
pub struct RoomEngine {
    inner: Mutex<EngineInner>,
}

impl Default for RoomEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomEngine {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(EngineInner {
                registry: Registry::new(),
                presence: PresenceMap::new(),
            }),
        }
    }

    /// Transport-level connect. The connection has no identity yet and
    /// nothing is announced.
    pub fn register(&self, conn: ConnectionId) {
        self.lock().registry.register(conn);
    }

    /// Consume one client event and return the deliveries it produces.
    pub fn handle(&self, conn: ConnectionId, event: ClientEvent) -> Vec<Delivery> {
        match event {
            ClientEvent::JoinRoom { room, username } => self.join(conn, room, username, false),
            ClientEvent::RejoinRoom { room, username } => self.join(conn, room, username, true),
            ClientEvent::SendMessage(payload) => self.send_message(conn, payload),
            ClientEvent::MessageReceived { index, room } => {
                self.message_received(conn, index, room)
            }
        }
    }

    /// Transport-level disconnect. Idempotent: unknown or already-removed
    /// ids produce nothing.
    pub fn disconnect(&self, conn: ConnectionId) -> Vec<Delivery> {
        let mut inner = self.lock();
        let Some(name) = inner.registry.unregister(conn) else {
            return Vec::new();
        };

        // Offline is announced per disconnecting connection, without checking
        // whether another connection under the same name is still live.
        inner.presence.mark_offline(&name);
        tracing::info!(conn_id = %conn, username = %name, "connection went offline");

        vec![Delivery {
            targets: inner.registry.all_connections(),
            event: ServerEvent::UserOffline { username: name },
        }]
    }

    pub fn identity_of(&self, conn: ConnectionId) -> Option<String> {
        self.lock().registry.identity_of(conn).map(str::to_string)
    }

    /// Presence snapshot for the REST endpoint.
    pub fn presence_snapshot(&self) -> Vec<(String, PresenceStatus)> {
        self.lock().presence.snapshot()
    }

    fn join(
        &self,
        conn: ConnectionId,
        room: Option<RoomToken>,
        username: Option<String>,
        rejoin: bool,
    ) -> Vec<Delivery> {
        // A join without both fields has no effect at all.
        let (Some(room), Some(username)) = (room, username) else {
            tracing::warn!(conn_id = %conn, "join event missing room or username, skipping");
            return Vec::new();
        };

        let mut inner = self.lock();
        let newly_announced = inner.registry.set_identity(conn, &username, &room);
        let mut deliveries = Vec::new();

        // Announce the member at most once per connection lifetime. A rejoin
        // re-establishes membership silently even on a fresh connection id.
        if newly_announced && !rejoin {
            deliveries.push(Delivery {
                targets: inner.registry.members_of(&room),
                event: ServerEvent::UserJoined {
                    username: username.clone(),
                },
            });
        }

        inner.presence.mark_online(&username);
        deliveries.push(Delivery {
            targets: inner.registry.all_connections(),
            event: ServerEvent::UserOnline {
                username: username.clone(),
            },
        });

        // Room-scoped echo so existing members see the rejoining peer at
        // once, ahead of any global refresh.
        if rejoin {
            deliveries.push(Delivery {
                targets: inner.registry.members_of(&room),
                event: ServerEvent::UserOnline {
                    username: username.clone(),
                },
            });
        }

        tracing::info!(
            conn_id = %conn,
            room = %room,
            username = %username,
            rejoin,
            "room membership updated"
        );
        deliveries
    }

    fn send_message(&self, conn: ConnectionId, payload: MessagePayload) -> Vec<Delivery> {
        let Some(room) = payload.room.clone() else {
            tracing::warn!(conn_id = %conn, "send_message without room, skipping");
            return Vec::new();
        };

        let mut inner = self.lock();
        let mut deliveries = Vec::new();

        // The whole room gets the message, sender included.
        let members = inner.registry.members_of(&room);
        if !members.is_empty() {
            deliveries.push(Delivery {
                targets: members,
                event: ServerEvent::ReceiveMessage(payload.clone()),
            });
        }

        // Re-announce the sender as online so members who joined after the
        // sender's original announcement still see them.
        let sender = payload
            .username
            .or_else(|| inner.registry.identity_of(conn).map(str::to_string));
        if let Some(username) = sender {
            inner.presence.mark_online(&username);
            deliveries.push(Delivery {
                targets: inner.registry.all_connections(),
                event: ServerEvent::UserOnline { username },
            });
        }

        deliveries
    }

    fn message_received(
        &self,
        conn: ConnectionId,
        index: Option<u64>,
        room: Option<RoomToken>,
    ) -> Vec<Delivery> {
        let (Some(index), Some(room)) = (index, room) else {
            tracing::warn!(conn_id = %conn, "message_received missing index or room, skipping");
            return Vec::new();
        };

        let inner = self.lock();
        receipts::correlate(&inner.registry, &room, index, conn)
            .into_iter()
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EngineInner> {
        // Engine state is plain data; a poisoned lock only means a panic
        // mid-mutation elsewhere, and the maps are still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
