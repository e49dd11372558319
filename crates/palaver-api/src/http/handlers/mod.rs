//! HTTP and WebSocket handlers.

pub mod room;
pub mod ws;
