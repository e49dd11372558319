//! HTTP and WebSocket layer for Palaver.
//!
//! Axum-based surface: the `/ws` event channel, the `/api/v1/` read/create
//! endpoints, and the error-to-status mapping.

pub mod error;
pub mod handlers;
pub mod router;
