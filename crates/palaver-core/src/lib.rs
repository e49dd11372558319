//! Routing and persistence-coordination core for Palaver.
//!
//! This crate defines the persistence "port" ([`store::TranscriptStore`])
//! that the infrastructure layer implements, plus the in-process pieces the
//! relay is built from: the room directory, the connection registry, the
//! message router, and the history service. It depends only on
//! `palaver-types` -- never on a database or HTTP crate.

pub mod directory;
pub mod history;
pub mod registry;
pub mod router;
pub mod store;
