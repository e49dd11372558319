//! Transcript store trait definition.
//!
//! Defines the persistence boundary for room transcripts. The infrastructure
//! layer (palaver-infra) implements this trait with SQLite; tests implement
//! it with in-memory fakes to exercise the router in isolation.

use palaver_types::error::TranscriptError;
use palaver_types::message::ChatMessage;

/// Persistence port for the durable, append-only room transcripts.
///
/// Durability contract: once `append_message` returns `Ok`, the message must
/// be visible to every subsequent `load_transcript` for that room. There is
/// no write-then-lose window observable to the router.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait TranscriptStore: Send + Sync {
    /// Allocate the backing row for a room. Idempotent: creating a room that
    /// already exists is a no-op, and the existing transcript is untouched.
    fn create_room(
        &self,
        room_id: &str,
        name: Option<&str>,
    ) -> impl std::future::Future<Output = Result<(), TranscriptError>> + Send;

    /// Persist one message, assigning its id and server-side timestamp.
    ///
    /// Fails only with [`TranscriptError::Unavailable`] when the store is
    /// unreachable or the write itself fails.
    fn append_message(
        &self,
        room_id: &str,
        sender: &str,
        body: &str,
    ) -> impl std::future::Future<Output = Result<ChatMessage, TranscriptError>> + Send;

    /// Load a room's full transcript in arrival order.
    ///
    /// Returns [`TranscriptError::NotFound`] for a room that was never
    /// created, and an empty vector (not an error) for a created room with
    /// no messages yet.
    fn load_transcript(
        &self,
        room_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, TranscriptError>> + Send;

    /// Update a room's display name. The transcript is unaffected.
    fn set_room_name(
        &self,
        room_id: &str,
        name: &str,
    ) -> impl std::future::Future<Output = Result<(), TranscriptError>> + Send;
}
