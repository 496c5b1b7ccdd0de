//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and its mapping
//! onto HTTP responses.
//!
//! Every failure path produces an explicit response; nothing is swallowed.
//! The four unauthorized causes (bad credentials, missing token, bad
//! signature, expired token) all collapse into one opaque 401; the precise
//! cause is only ever logged server-side.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use restobook_core::ports::PortError;
use serde_json::json;
use tracing::error;

use crate::config::ConfigError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Missing or malformed input the client can fix (HTTP 400).
    #[error("{0}")]
    Validation(String),

    /// Registration hit an identity that already exists (HTTP 409).
    #[error("Email already exists")]
    DuplicateIdentity,

    /// Any authentication failure (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// Deleting a reservation that does not exist or is not owned by the
    /// caller (HTTP 403). The response never reveals which of the two it was.
    #[error("Not authorized or reservation not found")]
    NotAuthorizedOrNotFound,

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::DuplicateEmail => ApiError::DuplicateIdentity,
            // The only port producer of NotFound is the conditional delete,
            // which must stay ambiguous between "missing" and "not yours".
            PortError::NotFound(_) => ApiError::NotAuthorizedOrNotFound,
            PortError::Unexpected(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::DuplicateIdentity => (StatusCode::CONFLICT, self.to_string()),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::NotAuthorizedOrNotFound => (StatusCode::FORBIDDEN, self.to_string()),
            // Storage and other internal failures: log the detail, return an
            // opaque 500. The request left no partial state behind.
            _ => {
                error!("request failed: {:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
