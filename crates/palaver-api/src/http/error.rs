//! Application error type mapping to HTTP status codes.
//!
//! The two transcript outcomes must stay distinguishable to clients: a room
//! that never existed is 404, a store that is temporarily down is 503.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use palaver_types::error::TranscriptError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Transcript store outcomes (not-found, unavailable).
    Transcript(TranscriptError),
    /// Malformed request payload.
    Validation(String),
}

impl From<TranscriptError> for ApiError {
    fn from(e: TranscriptError) -> Self {
        ApiError::Transcript(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Transcript(TranscriptError::NotFound) => (
                StatusCode::NOT_FOUND,
                "ROOM_NOT_FOUND",
                "Room not found".to_string(),
            ),
            ApiError::Transcript(TranscriptError::Unavailable(msg)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORE_UNAVAILABLE",
                format!("Transcript store unavailable: {msg}"),
            ),
            ApiError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
        };

        let body = json!({
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let response = ApiError::Transcript(TranscriptError::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unavailable_maps_to_503_not_404() {
        let response =
            ApiError::Transcript(TranscriptError::Unavailable("down".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn validation_maps_to_400() {
        let response = ApiError::Validation("name is required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
