//! Message router: the validate, persist, broadcast pipeline.
//!
//! Every inbound chat event flows through [`MessageRouter::handle_chat`],
//! which enforces the relay's one non-negotiable invariant: a message is
//! broadcast only after its durable write succeeds. A message the store
//! rejected is never seen live by any connection, so live delivery and
//! later history reconstruction can never disagree about what happened.
//!
//! Delivery is fire-and-forget: malformed events are logged and discarded
//! without any signal back to the sender.

use std::sync::Arc;

use palaver_types::error::{TranscriptError, ValidationError};
use palaver_types::event::ServerEvent;
use palaver_types::message::ChatMessage;

use crate::directory::RoomDirectory;
use crate::registry::ConnectionRegistry;
use crate::store::TranscriptStore;

/// Outcome of routing one chat event.
///
/// Surfacing the disposition (rather than returning `()`) is what makes the
/// persist-then-broadcast contract testable: callers and tests can observe
/// exactly why an event did or did not reach the room.
#[derive(Debug)]
pub enum Delivery {
    /// Persisted and fanned out to `subscribers` member connections.
    Delivered {
        message: ChatMessage,
        subscribers: usize,
    },
    /// Rejected by validation; nothing persisted, nothing broadcast.
    Invalid(ValidationError),
    /// Persistence failed; the event was dropped without broadcast.
    Dropped(TranscriptError),
}

/// Routes inbound events: validates, persists through the transcript store,
/// and fans out to subscribed connections.
///
/// Generic over the store so the pipeline can be exercised against
/// in-memory fakes; the API layer pins `S` to the SQLite implementation.
pub struct MessageRouter<S> {
    store: Arc<S>,
    directory: Arc<RoomDirectory>,
    registry: Arc<ConnectionRegistry>,
}

impl<S: TranscriptStore> MessageRouter<S> {
    pub fn new(
        store: Arc<S>,
        directory: Arc<RoomDirectory>,
        registry: Arc<ConnectionRegistry>,
    ) -> Self {
        Self {
            store,
            directory,
            registry,
        }
    }

    /// Ensure a room exists, in memory and in the store (join path).
    ///
    /// Rooms come into being on first join or first message; either path
    /// lands here. Allocation of the backing transcript row happens at most
    /// once per room; a failed allocation is retried on the next call.
    pub async fn ensure_room(&self, room_id: &str) -> Result<(), TranscriptError> {
        let room = self.directory.ensure(room_id);
        self.init_room_row(&room).await
    }

    async fn init_room_row(&self, room: &crate::directory::Room) -> Result<(), TranscriptError> {
        room.store_init
            .get_or_try_init(|| self.store.create_room(&room.id, None))
            .await?;
        Ok(())
    }

    /// Route one chat message: validate, ensure the room, persist, broadcast.
    ///
    /// Steps after validation run under the room's sequencing mutex, so
    /// messages for one room are persisted and broadcast in the order they
    /// were accepted, no matter which connections sent them. Different rooms
    /// interleave freely.
    pub async fn handle_chat(&self, room_id: &str, sender: &str, body: &str) -> Delivery {
        if let Err(err) = validate_chat(room_id, sender, body) {
            tracing::debug!(%err, "discarding malformed chat event");
            return Delivery::Invalid(err);
        }

        let room = self.directory.ensure(room_id);
        let _seq = room.sequencer.lock().await;

        if let Err(err) = self.init_room_row(&room).await {
            tracing::warn!(room_id, %err, "room allocation failed, dropping message");
            return Delivery::Dropped(err);
        }

        let message = match self.store.append_message(room_id, sender, body).await {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!(room_id, %err, "persistence failed, dropping message");
                return Delivery::Dropped(err);
            }
        };

        // Persistence succeeded; only now may the message go live.
        let subscribers = self
            .registry
            .broadcast_room(room_id, &ServerEvent::from_message(&message));
        tracing::debug!(room_id, subscribers, "chat message fanned out");

        Delivery::Delivered {
            message,
            subscribers,
        }
    }

    /// Fan a file announcement out to every connected client.
    ///
    /// This side channel deliberately bypasses persistence and ignores room
    /// scope, matching the relay's historical behavior: file events reach
    /// all connections, not just room members. Returns the delivery count.
    pub fn handle_share_file(&self, file: serde_json::Value) -> usize {
        let delivered = self.registry.broadcast_all(&ServerEvent::FileShared { file });
        tracing::debug!(delivered, "file announcement fanned out to all connections");
        delivered
    }
}

fn validate_chat(room_id: &str, sender: &str, body: &str) -> Result<(), ValidationError> {
    if room_id.is_empty() {
        return Err(ValidationError::EmptyField("room_id"));
    }
    if sender.is_empty() {
        return Err(ValidationError::EmptyField("sender"));
    }
    if body.is_empty() {
        return Err(ValidationError::EmptyField("body"));
    }
    Ok(())
}
