//! In-memory room directory.
//!
//! Maps opaque room identifiers to live room entries. Entries are created on
//! first join or first message and live for the life of the process; rooms
//! are never deleted within this scope.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OnceCell};

/// A live room entry.
///
/// Besides the identifier, a room carries the two pieces of coordination
/// state the router needs: a sequencing mutex and a one-time guard for
/// allocating the room's backing transcript row.
pub struct Room {
    pub id: String,
    /// Held across persist+broadcast so events for one room are processed
    /// first-in-first-out regardless of which connection sent them. Rooms
    /// lock independently; there is no cross-room contention.
    pub sequencer: Mutex<()>,
    /// Set once the room's backing row exists in the transcript store.
    pub store_init: OnceCell<()>,
}

impl Room {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            sequencer: Mutex::new(()),
            store_init: OnceCell::new(),
        }
    }
}

/// Concurrent directory of all rooms this process has seen.
#[derive(Default)]
pub struct RoomDirectory {
    rooms: DashMap<String, Arc<Room>>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the entry for `room_id`, creating it if absent. Idempotent:
    /// concurrent callers for the same id all receive the same entry.
    pub fn ensure(&self, room_id: &str) -> Arc<Room> {
        self.rooms
            .entry(room_id.to_string())
            .or_insert_with(|| Arc::new(Room::new(room_id)))
            .clone()
    }

    pub fn get(&self, room_id: &str) -> Option<Arc<Room>> {
        self.rooms.get(room_id).map(|entry| entry.clone())
    }
}
