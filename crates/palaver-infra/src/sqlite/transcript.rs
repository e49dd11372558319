//! SQLite transcript store implementation.
//!
//! Implements `TranscriptStore` from `palaver-core` using sqlx with the
//! split read/write pool. Message ids and timestamps are assigned here, at
//! persistence time, from the store's own clock -- callers never supply
//! them, which is what makes "broadcast carries the persisted timestamp"
//! possible upstream.

use chrono::{DateTime, Utc};
use palaver_core::store::TranscriptStore;
use palaver_types::error::TranscriptError;
use palaver_types::message::ChatMessage;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `TranscriptStore`.
pub struct SqliteTranscriptStore {
    pool: DatabasePool,
}

impl SqliteTranscriptStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn unavailable(err: sqlx::Error) -> TranscriptError {
    TranscriptError::Unavailable(err.to_string())
}

fn parse_uuid(s: &str) -> Result<Uuid, TranscriptError> {
    s.parse::<Uuid>()
        .map_err(|e| TranscriptError::Unavailable(format!("invalid UUID in row: {e}")))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, TranscriptError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| TranscriptError::Unavailable(format!("invalid datetime in row: {e}")))
}

fn message_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ChatMessage, TranscriptError> {
    let id: String = row.try_get("id").map_err(unavailable)?;
    let room_id: String = row.try_get("room_id").map_err(unavailable)?;
    let sender: String = row.try_get("sender").map_err(unavailable)?;
    let body: String = row.try_get("body").map_err(unavailable)?;
    let timestamp: String = row.try_get("timestamp").map_err(unavailable)?;

    Ok(ChatMessage {
        id: parse_uuid(&id)?,
        room_id,
        sender,
        body,
        timestamp: parse_datetime(&timestamp)?,
    })
}

// ---------------------------------------------------------------------------
// TranscriptStore impl
// ---------------------------------------------------------------------------

impl TranscriptStore for SqliteTranscriptStore {
    async fn create_room(&self, room_id: &str, name: Option<&str>) -> Result<(), TranscriptError> {
        sqlx::query("INSERT OR IGNORE INTO rooms (room_id, name, created_at) VALUES (?, ?, ?)")
            .bind(room_id)
            .bind(name)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool.writer)
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn append_message(
        &self,
        room_id: &str,
        sender: &str,
        body: &str,
    ) -> Result<ChatMessage, TranscriptError> {
        let message = ChatMessage {
            id: Uuid::now_v7(),
            room_id: room_id.to_string(),
            sender: sender.to_string(),
            body: body.to_string(),
            timestamp: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO messages (id, room_id, sender, body, timestamp) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(message.id.to_string())
        .bind(&message.room_id)
        .bind(&message.sender)
        .bind(&message.body)
        .bind(message.timestamp.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(unavailable)?;

        Ok(message)
    }

    async fn load_transcript(&self, room_id: &str) -> Result<Vec<ChatMessage>, TranscriptError> {
        // Not-found vs empty: a room row must exist before its transcript
        // (possibly empty) is a meaningful answer.
        let exists = sqlx::query("SELECT 1 FROM rooms WHERE room_id = ?")
            .bind(room_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(unavailable)?;
        if exists.is_none() {
            return Err(TranscriptError::NotFound);
        }

        let rows = sqlx::query(
            "SELECT id, room_id, sender, body, timestamp FROM messages \
             WHERE room_id = ? ORDER BY seq ASC",
        )
        .bind(room_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(unavailable)?;

        rows.iter().map(message_from_row).collect()
    }

    async fn set_room_name(&self, room_id: &str, name: &str) -> Result<(), TranscriptError> {
        let result = sqlx::query("UPDATE rooms SET name = ? WHERE room_id = ?")
            .bind(name)
            .bind(room_id)
            .execute(&self.pool.writer)
            .await
            .map_err(unavailable)?;

        if result.rows_affected() == 0 {
            return Err(TranscriptError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store(dir: &tempfile::TempDir) -> SqliteTranscriptStore {
        let db_path = dir.path().join("transcript.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        SqliteTranscriptStore::new(DatabasePool::new(&url).await.unwrap())
    }

    #[tokio::test]
    async fn append_then_load_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir).await;

        store.create_room("r1", Some("general")).await.unwrap();
        store.append_message("r1", "alice", "first").await.unwrap();
        store.append_message("r1", "bob", "second").await.unwrap();
        store.append_message("r1", "alice", "third").await.unwrap();

        let transcript = store.load_transcript("r1").await.unwrap();
        let bodies: Vec<&str> = transcript.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, ["first", "second", "third"]);
        assert!(transcript.iter().all(|m| m.room_id == "r1"));
    }

    #[tokio::test]
    async fn load_missing_room_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir).await;

        assert!(matches!(
            store.load_transcript("ghost").await,
            Err(TranscriptError::NotFound)
        ));
    }

    #[tokio::test]
    async fn created_room_with_no_messages_is_empty_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir).await;

        store.create_room("r1", None).await.unwrap();
        assert!(store.load_transcript("r1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_room_is_idempotent_and_keeps_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir).await;

        store.create_room("r1", Some("general")).await.unwrap();
        store.append_message("r1", "alice", "hi").await.unwrap();
        store.create_room("r1", Some("renamed")).await.unwrap();

        assert_eq!(store.load_transcript("r1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn append_is_immediately_visible_to_reads() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir).await;

        store.create_room("r1", None).await.unwrap();
        let written = store.append_message("r1", "alice", "hi").await.unwrap();

        // The write goes through the writer pool and the read through the
        // reader pool; the message must already be visible.
        let transcript = store.load_transcript("r1").await.unwrap();
        assert_eq!(transcript, vec![written]);
    }

    #[tokio::test]
    async fn messages_interleave_across_rooms_by_arrival() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir).await;

        store.create_room("r1", None).await.unwrap();
        store.create_room("r2", None).await.unwrap();
        store.append_message("r1", "alice", "a1").await.unwrap();
        store.append_message("r2", "carol", "c1").await.unwrap();
        store.append_message("r1", "alice", "a2").await.unwrap();

        let r1: Vec<String> = store
            .load_transcript("r1")
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.body)
            .collect();
        assert_eq!(r1, ["a1", "a2"]);
        assert_eq!(store.load_transcript("r2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn set_room_name_requires_an_existing_room() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir).await;

        assert!(matches!(
            store.set_room_name("ghost", "nope").await,
            Err(TranscriptError::NotFound)
        ));

        store.create_room("r1", None).await.unwrap();
        store.set_room_name("r1", "general").await.unwrap();

        let (name,): (Option<String>,) =
            sqlx::query_as("SELECT name FROM rooms WHERE room_id = 'r1'")
                .fetch_one(&store.pool.reader)
                .await
                .unwrap();
        assert_eq!(name.as_deref(), Some("general"));
    }
}
