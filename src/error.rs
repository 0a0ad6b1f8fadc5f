//! Error types for chatrelay
//!
//! `AppError` covers startup and configuration failures and aborts the process.
//! `RelayError` covers per-request failures; it implements `IntoResponse` and
//! renders every failure as the shared `{"error": <kind>, ...}` envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Startup and configuration errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file '{path}': {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error(
        "OPENROUTER_API_KEY is missing. Set it in the environment or in a .env file before starting the server."
    )]
    MissingApiKey,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for startup Results
pub type AppResult<T> = Result<T, AppError>;

/// Per-request relay failures
///
/// Each variant maps to exactly one envelope kind and status code.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("message is empty or missing")]
    MessageRequired,

    #[error("upstream API key is not configured")]
    ApiKeyMissing,

    #[error("network error talking to upstream: {0}")]
    Network(#[source] reqwest::Error),

    #[error("upstream returned HTTP {status}")]
    Upstream { status: StatusCode, body: String },

    #[error("HTTP error {status}: {detail}")]
    Http { status: StatusCode, detail: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Machine-readable kind placed in the envelope's `error` field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MessageRequired => "message_required",
            Self::ApiKeyMissing => "api_key_missing",
            Self::Network(_) => "network_error",
            Self::Upstream { .. } => "upstream_api_error",
            Self::Http { .. } => "http_error",
            Self::Internal(_) => "internal_server_error",
        }
    }

    /// HTTP status returned to the caller
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MessageRequired => StatusCode::BAD_REQUEST,
            Self::ApiKeyMissing => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Network(_) => StatusCode::BAD_GATEWAY,
            Self::Upstream { status, .. } => *status,
            Self::Http { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Envelope body for this error
    pub fn to_body(&self) -> serde_json::Value {
        match self {
            Self::MessageRequired | Self::ApiKeyMissing => json!({ "error": self.kind() }),
            Self::Network(source) => json!({
                "error": self.kind(),
                "detail": error_chain(source),
            }),
            Self::Upstream { status, body } => json!({
                "error": self.kind(),
                "status_code": status.as_u16(),
                "detail": body,
            }),
            Self::Http { detail, .. } | Self::Internal(detail) => json!({
                "error": self.kind(),
                "detail": detail,
            }),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_body())).into_response()
    }
}

/// Render an error and all of its sources as one line
///
/// reqwest's top-level message only names the URL; the interesting part
/// (connection refused, timed out, dns failure) lives further down the chain.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let inner_text = inner.to_string();
        if !text.contains(&inner_text) {
            text.push_str(": ");
            text.push_str(&inner_text);
        }
        source = inner.source();
    }
    text
}
