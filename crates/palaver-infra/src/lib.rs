//! Infrastructure implementations for Palaver.
//!
//! Implements the `TranscriptStore` port from `palaver-core` with SQLite.

pub mod sqlite;
