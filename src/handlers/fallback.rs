//! Envelope responses for requests no route handles

use crate::error::RelayError;
use axum::http::StatusCode;

/// Fallback for unknown paths
pub async fn not_found() -> RelayError {
    http_error(StatusCode::NOT_FOUND)
}

/// Fallback for known paths hit with the wrong method
pub async fn method_not_allowed() -> RelayError {
    http_error(StatusCode::METHOD_NOT_ALLOWED)
}

fn http_error(status: StatusCode) -> RelayError {
    RelayError::Http {
        status,
        detail: status.canonical_reason().unwrap_or("HTTP error").to_string(),
    }
}
