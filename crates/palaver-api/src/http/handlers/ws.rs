//! WebSocket handler: the bidirectional event channel per client.
//!
//! `GET /ws` upgrades to a WebSocket. Once connected, the handler:
//!
//! - **Delivers events:** registers an unbounded channel with the
//!   [`ConnectionRegistry`] and forwards every [`ServerEvent`] the relay
//!   pushes into it as a JSON text frame.
//! - **Receives events:** parses incoming text frames as [`ClientEvent`]
//!   (join, leave, chat message, share file) and routes them.
//!
//! Delivery is fire-and-forget: malformed frames are logged and ignored,
//! and no acknowledgment or rejection ever goes back to the sender.
//!
//! Closing the socket removes the connection's subscriptions but never
//! cancels a persistence write already in flight -- the write is awaited
//! inside this task before the next frame is read, which is also what
//! keeps one connection's messages in order.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use palaver_core::registry::ConnectionId;
use palaver_types::event::ClientEvent;

use crate::state::AppState;

/// Upgrade an HTTP request to the relay's WebSocket event channel.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws_connection(socket, state))
}

/// Core WebSocket connection loop.
///
/// Uses `tokio::select!` to multiplex between outbound events queued by the
/// registry and inbound frames from the client, keeping both directions in
/// a single task.
async fn handle_ws_connection(socket: WebSocket, state: AppState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let conn_id: ConnectionId = Uuid::now_v7();
    let (tx, mut rx) = mpsc::unbounded_channel();
    state.registry.register(conn_id, tx);
    tracing::debug!(%conn_id, "websocket connected");

    loop {
        tokio::select! {
            // --- Branch 1: Forward relay events to the client ---
            outbound = rx.recv() => {
                match outbound {
                    Some(event) => match serde_json::to_string(&event) {
                        Ok(json) => {
                            if ws_sender.send(Message::Text(json.into())).await.is_err() {
                                // Client disconnected
                                break;
                            }
                        }
                        Err(err) => {
                            tracing::warn!(%err, "failed to serialize outbound event");
                        }
                    },
                    // Registry side dropped the sender (shutdown)
                    None => break,
                }
            }

            // --- Branch 2: Route frames from the client ---
            frame = ws_receiver.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        process_frame(&text, conn_id, &state).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        // Client disconnected
                        break;
                    }
                    Some(Err(err)) => {
                        tracing::debug!(%conn_id, "websocket receive error: {err}");
                        break;
                    }
                    // Ignore binary, ping, pong protocol frames
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    state.registry.deregister(conn_id);
    tracing::debug!(%conn_id, "websocket disconnected");
}

/// Parse and route a single inbound frame.
async fn process_frame(text: &str, conn_id: ConnectionId, state: &AppState) {
    let event: ClientEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(err) => {
            tracing::warn!(raw = %text, error = %err, "ignoring malformed frame");
            return;
        }
    };

    match event {
        ClientEvent::Join { room_id } => {
            // The room comes into being on first join; a store failure here
            // still leaves the in-memory subscription in place, so live
            // delivery keeps working while the store recovers.
            if let Err(err) = state.router.ensure_room(&room_id).await {
                tracing::warn!(room_id, %err, "room allocation deferred");
            }
            state.registry.subscribe(conn_id, &room_id);
            tracing::debug!(%conn_id, room_id, "joined room");
        }
        ClientEvent::Leave { room_id } => {
            state.registry.unsubscribe(conn_id, &room_id);
            tracing::debug!(%conn_id, room_id, "left room");
        }
        ClientEvent::ChatMessage {
            room_id,
            sender,
            body,
        } => {
            // Fire-and-forget: the router logs the disposition; nothing is
            // reported back to the sender.
            let _ = state.router.handle_chat(&room_id, &sender, &body).await;
        }
        ClientEvent::ShareFile { file } => {
            state.router.handle_share_file(file);
        }
    }
}
