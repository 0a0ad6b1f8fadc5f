//! Client for the upstream completion API
//!
//! Holds one pooled `reqwest::Client` for the life of the process. Every call
//! is a single attempt bounded by the configured timeout.

pub mod types;

pub use types::{
    CompletionRequest, NO_RESPONSE_FALLBACK, RequestMessage, Role, UpstreamCompletion,
};

use crate::config::UpstreamConfig;
use crate::error::{AppError, AppResult, RelayError, error_chain};
use axum::http::StatusCode;
use std::time::Duration;

/// Upstream completion client
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    config: UpstreamConfig,
    http: reqwest::Client,
}

impl UpstreamClient {
    /// Build a client from upstream settings
    pub fn new(config: UpstreamConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, http })
    }

    /// Whether a credential is available for the Authorization header
    pub fn has_credential(&self) -> bool {
        !self.config.api_key().trim().is_empty()
    }

    /// Full URL of the completions endpoint
    pub fn completion_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url())
    }

    /// Fixed-shape completion request for one user message
    pub fn build_request(&self, message: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.config.model().to_string(),
            messages: vec![
                RequestMessage {
                    role: Role::System,
                    content: self.config.system_prompt().to_string(),
                },
                RequestMessage {
                    role: Role::User,
                    content: message.to_string(),
                },
            ],
            temperature: self.config.temperature(),
            max_tokens: self.config.max_tokens(),
        }
    }

    /// Send one completion request and decode the result
    ///
    /// Transport failures (including reading the body) become
    /// `RelayError::Network`; non-2xx statuses become `RelayError::Upstream`
    /// with the raw body; an undecodable 2xx body becomes `RelayError::Internal`.
    pub async fn complete(&self, message: &str) -> Result<UpstreamCompletion, RelayError> {
        if !self.has_credential() {
            return Err(RelayError::ApiKeyMissing);
        }

        let url = self.completion_url();
        let request = self.build_request(message);

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.config.api_key())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(url = %url, error = %error_chain(&e), "Upstream request failed");
                RelayError::Network(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::warn!(url = %url, error = %error_chain(&e), "Failed to read upstream body");
            RelayError::Network(e)
        })?;

        tracing::info!(url = %url, status = %status, "Upstream responded");
        tracing::debug!(body = %body, "Upstream response body");

        if !status.is_success() {
            let status = StatusCode::from_u16(status.as_u16())
                .map_err(|e| RelayError::Internal(format!("invalid upstream status: {}", e)))?;
            return Err(RelayError::Upstream { status, body });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "Upstream returned malformed JSON");
            RelayError::Internal(format!("failed to decode upstream response: {}", e))
        })
    }
}
