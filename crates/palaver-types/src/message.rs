//! Room and chat message types for Palaver.
//!
//! A room is an opaque-id channel with an optional display name and an
//! ordered transcript. Messages are immutable once persisted; their id and
//! timestamp are assigned by the transcript store, never by the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Durable metadata for one chat room.
///
/// The `room_id` is an opaque string generated outside the core (the API
/// layer mints UUIDs for it); nothing in the relay infers structure from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomRecord {
    pub room_id: String,
    /// Optional display name; mutable metadata, unlike the transcript.
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A single persisted chat message.
///
/// Messages are ordered by arrival within their owning room and never
/// reordered. `timestamp` comes from the store clock at persistence time;
/// it is not guaranteed monotonic per room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Store-assigned UUID v7.
    pub id: Uuid,
    /// Owning room; every message belongs to exactly one.
    pub room_id: String,
    pub sender: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
}
