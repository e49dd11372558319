//! Connection registry: live connections and their room subscriptions.
//!
//! Each connection owns an unbounded mpsc sender; its WebSocket task drains
//! the matching receiver. Broadcast is therefore non-blocking: the registry
//! pushes events into channels and never awaits a socket write.
//!
//! Membership state is partitioned by dashmap shard -- subscriptions on
//! different connections and different rooms never contend on one lock.

use std::collections::HashSet;

use dashmap::DashMap;
use palaver_types::event::ServerEvent;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Opaque handle for one live connection. Assigned by the transport layer
/// at upgrade time.
pub type ConnectionId = Uuid;

struct Connection {
    sender: mpsc::UnboundedSender<ServerEvent>,
    rooms: HashSet<String>,
}

/// Registry of every live connection and the rooms each is subscribed to.
///
/// Created once at process start, injected into the router, and torn down
/// with the process. Delivery is best-effort: a connection whose receiver
/// has been dropped is simply skipped.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: DashMap<ConnectionId, Connection>,
    members: DashMap<String, HashSet<ConnectionId>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a newly upgraded connection with no subscriptions.
    pub fn register(&self, conn_id: ConnectionId, sender: mpsc::UnboundedSender<ServerEvent>) {
        self.connections.insert(
            conn_id,
            Connection {
                sender,
                rooms: HashSet::new(),
            },
        );
    }

    /// Remove a connection and all of its subscriptions (disconnect path).
    pub fn deregister(&self, conn_id: ConnectionId) {
        self.unsubscribe_all(conn_id);
        self.connections.remove(&conn_id);
    }

    /// Subscribe a connection to a room. Idempotent; a no-op for an unknown
    /// connection id.
    pub fn subscribe(&self, conn_id: ConnectionId, room_id: &str) {
        let Some(mut conn) = self.connections.get_mut(&conn_id) else {
            return;
        };
        conn.rooms.insert(room_id.to_string());
        drop(conn);
        self.members
            .entry(room_id.to_string())
            .or_default()
            .insert(conn_id);
    }

    /// Drop one subscription. Returns `true` if it existed.
    pub fn unsubscribe(&self, conn_id: ConnectionId, room_id: &str) -> bool {
        if let Some(mut conn) = self.connections.get_mut(&conn_id) {
            conn.rooms.remove(room_id);
        }
        match self.members.get_mut(room_id) {
            Some(mut members) => members.remove(&conn_id),
            None => false,
        }
    }

    /// Drop every subscription held by a connection.
    pub fn unsubscribe_all(&self, conn_id: ConnectionId) {
        let rooms = match self.connections.get_mut(&conn_id) {
            Some(mut conn) => std::mem::take(&mut conn.rooms),
            None => return,
        };
        for room_id in rooms {
            if let Some(mut members) = self.members.get_mut(&room_id) {
                members.remove(&conn_id);
            }
        }
    }

    /// Ids of the connections currently subscribed to a room.
    pub fn members_of(&self, room_id: &str) -> Vec<ConnectionId> {
        self.members
            .get(room_id)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Deliver an event to every member of a room, the sender's own
    /// connection included. Returns the number of channels pushed to.
    pub fn broadcast_room(&self, room_id: &str, event: &ServerEvent) -> usize {
        let mut delivered = 0;
        for conn_id in self.members_of(room_id) {
            if let Some(conn) = self.connections.get(&conn_id) {
                if conn.sender.send(event.clone()).is_ok() {
                    delivered += 1;
                }
            }
        }
        delivered
    }

    /// Deliver an event to every registered connection regardless of room.
    /// Only the file-shared side channel uses this unscoped path.
    pub fn broadcast_all(&self, event: &ServerEvent) -> usize {
        let mut delivered = 0;
        for conn in self.connections.iter() {
            if conn.sender.send(event.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}
