//! WebSocket event vocabulary.
//!
//! Inbound frames are parsed into [`ClientEvent`] at the transport boundary,
//! so the router only ever handles well-shaped events. Unknown or malformed
//! frames are logged and ignored there. Outbound frames are [`ServerEvent`],
//! serialized as JSON text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An event received from a connected client.
///
/// Clients send JSON-encoded text frames matching one of these variants.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Subscribe this connection to a room.
    Join { room_id: String },
    /// Drop this connection's subscription to a room.
    Leave { room_id: String },
    /// Send a chat message into a room.
    ChatMessage {
        room_id: String,
        sender: String,
        body: String,
    },
    /// Announce a shared file. The payload is opaque to the relay and is
    /// fanned out to every connected client, not just room members.
    ShareFile { file: serde_json::Value },
}

/// An event delivered to a connected client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A chat message accepted and persisted for a room this connection
    /// is subscribed to. Includes the sender's own echo.
    ChatMessage {
        room_id: String,
        sender: String,
        body: String,
        timestamp: DateTime<Utc>,
    },
    /// A file announcement, delivered to every connection.
    FileShared { file: serde_json::Value },
}

impl ServerEvent {
    /// Build the outbound frame for a persisted message.
    pub fn from_message(msg: &crate::message::ChatMessage) -> Self {
        ServerEvent::ChatMessage {
            room_id: msg.room_id.clone(),
            sender: msg.sender.clone(),
            body: msg.body.clone(),
            timestamp: msg.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_join_frame() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"type":"join","room_id":"r1"}"#).unwrap();
        assert!(matches!(event, ClientEvent::Join { room_id } if room_id == "r1"));
    }

    #[test]
    fn parses_chat_message_frame() {
        let event: ClientEvent = serde_json::from_str(
            r#"{"type":"chat_message","room_id":"r1","sender":"alice","body":"hi"}"#,
        )
        .unwrap();
        match event {
            ClientEvent::ChatMessage { room_id, sender, body } => {
                assert_eq!(room_id, "r1");
                assert_eq!(sender, "alice");
                assert_eq!(body, "hi");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn parses_share_file_with_opaque_payload() {
        let event: ClientEvent = serde_json::from_str(
            r#"{"type":"share_file","file":{"name":"notes.pdf","size":1024}}"#,
        )
        .unwrap();
        match event {
            ClientEvent::ShareFile { file } => assert_eq!(file["name"], "notes.pdf"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_frame_type() {
        let result = serde_json::from_str::<ClientEvent>(r#"{"type":"nope"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn serializes_file_shared_frame() {
        let event = ServerEvent::FileShared {
            file: serde_json::json!({"name": "a.txt"}),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"file_shared""#));
        assert!(json.contains("a.txt"));
    }

    #[test]
    fn from_message_carries_store_timestamp() {
        let msg = crate::message::ChatMessage {
            id: uuid::Uuid::now_v7(),
            room_id: "r1".to_string(),
            sender: "alice".to_string(),
            body: "hi".to_string(),
            timestamp: Utc::now(),
        };
        match ServerEvent::from_message(&msg) {
            ServerEvent::ChatMessage { timestamp, .. } => assert_eq!(timestamp, msg.timestamp),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
