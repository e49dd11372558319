//! Shared domain types for Palaver.
//!
//! This crate contains the core domain types used across the relay:
//! rooms, chat messages, the WebSocket event vocabulary, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod error;
pub mod event;
pub mod message;
