//! Chat endpoint handler
//!
//! Handles POST /chat: validate the message, forward it upstream, relay the
//! first choice back.

use crate::error::RelayError;
use crate::handlers::AppState;
use crate::middleware::RequestId;
use crate::upstream::UpstreamCompletion;
use axum::{
    Extension, Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Chat request from a caller
///
/// Holds the trimmed message. The only constructors reject empty text, so an
/// existing `ChatRequest` always has something to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    message: String,
}

impl ChatRequest {
    /// Trim `message` and reject it if nothing is left
    pub fn new(message: &str) -> Result<Self, RelayError> {
        let trimmed = message.trim();
        if trimmed.is_empty() {
            return Err(RelayError::MessageRequired);
        }
        Ok(Self {
            message: trimmed.to_string(),
        })
    }

    /// Parse a raw request body, whatever its declared content type
    ///
    /// Bodies that are not JSON objects, and `message` values that are not
    /// strings, count as a missing message.
    pub fn from_body(body: &[u8]) -> Result<Self, RelayError> {
        let value: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(_) => return Err(RelayError::MessageRequired),
        };

        let message = value
            .get("message")
            .and_then(Value::as_str)
            .ok_or(RelayError::MessageRequired)?;

        Self::new(message)
    }

    /// Get the trimmed message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Successful relay response
///
/// `response` carries the first choice's content unchanged: usually a string,
/// `null` when absent, or whatever other JSON the upstream put there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    response: Value,
}

impl ChatResponse {
    pub fn new(response: Value) -> Self {
        Self { response }
    }

    /// Map a decoded upstream completion to the caller-facing body
    pub fn from_completion(completion: &UpstreamCompletion) -> Self {
        Self::new(completion.first_content())
    }

    /// Relayed content
    pub fn response(&self) -> &Value {
        &self.response
    }
}

/// POST /chat handler
///
/// One upstream attempt per request, bounded by the upstream timeout.
/// The message check runs before the credential check, and both run before
/// any network access.
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ChatResponse>, RelayError> {
    let body = body.map_err(|rejection| RelayError::Http {
        status: rejection.status(),
        detail: rejection.body_text(),
    })?;

    let request = ChatRequest::from_body(&body).inspect_err(|_| {
        tracing::debug!(request_id = %request_id, "Rejected chat request without message");
    })?;

    tracing::debug!(
        request_id = %request_id,
        message_length = request.message().len(),
        "Received chat request"
    );

    let upstream = state.upstream();
    if !upstream.has_credential() {
        tracing::error!(request_id = %request_id, "Upstream API key is not configured");
        return Err(RelayError::ApiKeyMissing);
    }

    let start = std::time::Instant::now();
    let completion = upstream
        .complete(request.message())
        .await
        .inspect_err(|e| {
            tracing::warn!(
                request_id = %request_id,
                error_kind = e.kind(),
                status = %e.status(),
                "Chat relay failed"
            );
        })?;

    tracing::info!(
        request_id = %request_id,
        choices = completion.choice_count(),
        duration_ms = %(start.elapsed().as_secs_f64() * 1000.0),
        "Chat relay completed"
    );

    Ok(Json(ChatResponse::from_completion(&completion)))
}
