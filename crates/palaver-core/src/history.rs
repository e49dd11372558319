//! History service: the authoritative transcript replay path.
//!
//! Live broadcast is best-effort; a connection that joins while a message is
//! in flight may or may not see it. History reads are the reliable way to
//! reconstruct everything a room has ever accepted.

use std::sync::Arc;

use palaver_types::error::TranscriptError;
use palaver_types::message::ChatMessage;

use crate::store::TranscriptStore;

/// Read-only view over the transcript store.
pub struct HistoryService<S> {
    store: Arc<S>,
}

impl<S: TranscriptStore> HistoryService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Load a room's transcript in arrival order.
    ///
    /// `NotFound` for a never-created room and `Unavailable` for a store
    /// failure are distinct outcomes; the API layer maps them to different
    /// responses.
    pub async fn history(&self, room_id: &str) -> Result<Vec<ChatMessage>, TranscriptError> {
        let messages = self.store.load_transcript(room_id).await?;
        tracing::debug!(room_id, count = messages.len(), "transcript loaded");
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{MemoryStore, UnreachableStore};

    #[tokio::test]
    async fn created_but_empty_room_yields_empty_transcript() {
        let store = Arc::new(MemoryStore::default());
        store.create_room("r1", None).await.unwrap();

        let history = HistoryService::new(store);
        assert!(history.history("r1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn never_created_room_is_not_found() {
        let history = HistoryService::new(Arc::new(MemoryStore::default()));
        assert!(matches!(
            history.history("ghost").await,
            Err(TranscriptError::NotFound)
        ));
    }

    #[tokio::test]
    async fn transcript_preserves_relative_order() {
        let store = Arc::new(MemoryStore::default());
        store.create_room("r1", None).await.unwrap();
        store.append_message("r1", "alice", "m1").await.unwrap();
        store.append_message("r1", "bob", "m2").await.unwrap();
        store.append_message("r1", "alice", "m3").await.unwrap();

        let history = HistoryService::new(store);
        let bodies: Vec<String> = history
            .history("r1")
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.body)
            .collect();
        assert_eq!(bodies, ["m1", "m2", "m3"]);
    }

    #[tokio::test]
    async fn store_failure_is_distinct_from_not_found() {
        let history = HistoryService::new(Arc::new(UnreachableStore));
        assert!(matches!(
            history.history("r1").await,
            Err(TranscriptError::Unavailable(_))
        ));
    }
}
