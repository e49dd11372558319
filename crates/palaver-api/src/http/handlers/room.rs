//! Room HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/rooms                    - Create a room
//! - GET  /api/v1/rooms/{room_id}/history  - Load a room's transcript

use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use palaver_core::store::TranscriptStore;
use palaver_types::message::ChatMessage;

use crate::http::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CreateRoomResponse {
    pub room_id: String,
    pub name: String,
}

/// POST /api/v1/rooms - Create a room with a fresh opaque identifier.
///
/// Identifier generation lives here, not in the core: the routing layer
/// treats room ids as opaque strings it never mints itself.
pub async fn create_room(
    State(state): State<AppState>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<Json<CreateRoomResponse>, ApiError> {
    if req.name.is_empty() {
        return Err(ApiError::Validation("room name is required".to_string()));
    }

    let room_id = Uuid::now_v7().to_string();
    state.store.create_room(&room_id, Some(&req.name)).await?;
    tracing::info!(room_id, name = %req.name, "room created");

    Ok(Json(CreateRoomResponse {
        room_id,
        name: req.name,
    }))
}

/// One transcript entry as served to clients.
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub sender: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
}

impl From<ChatMessage> for HistoryEntry {
    fn from(msg: ChatMessage) -> Self {
        Self {
            sender: msg.sender,
            body: msg.body,
            timestamp: msg.timestamp,
        }
    }
}

/// GET /api/v1/rooms/{room_id}/history - The room's transcript in arrival
/// order. 404 for a room that never existed, 503 while the store is down.
pub async fn get_history(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let messages = state.history.history(&room_id).await?;
    Ok(Json(messages.into_iter().map(HistoryEntry::from).collect()))
}
