use thiserror::Error;

/// Errors from the transcript store (used by the trait definition in
/// palaver-core).
///
/// The two variants are deliberately distinct outcomes for callers: a room
/// that was never created is `NotFound`, while a reachable-store failure is
/// `Unavailable` and maps to a transient-failure response, never a crash.
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("room not found")]
    NotFound,

    #[error("transcript store unavailable: {0}")]
    Unavailable(String),
}

/// A malformed inbound chat event.
///
/// Validation failures are discarded silently from the sender's perspective
/// (fire-and-forget delivery); this type exists so the router's rejection is
/// observable in logs and tests.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing or empty field: {0}")]
    EmptyField(&'static str),
}
