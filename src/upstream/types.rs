//! Wire types for the OpenAI-compatible chat completions API
//!
//! Only the fields the relay sends or reads are modelled; anything else in the
//! upstream payload is ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Content returned when the upstream answered with no choices at all
pub const NO_RESPONSE_FALLBACK: &str = "No response from OpenRouter.";

/// Role of a message in the outgoing conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One message of the outgoing conversation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestMessage {
    pub role: Role,
    pub content: String,
}

/// Body of `POST {base_url}/chat/completions`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<RequestMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Decoded 2xx body from the upstream
///
/// `choices` may be absent or `null`; both mean "no choices". Choices are kept
/// as raw JSON so that only the first one is ever inspected, and its content is
/// relayed whatever its JSON type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamCompletion {
    #[serde(default)]
    choices: Option<Vec<Value>>,
}

impl UpstreamCompletion {
    /// Number of choices in the payload
    pub fn choice_count(&self) -> usize {
        self.choices.as_ref().map_or(0, Vec::len)
    }

    /// Content to relay back to the caller
    ///
    /// With no choices this is the fixed fallback text. With a first choice
    /// that carries no message content it is `Value::Null`.
    pub fn first_content(&self) -> Value {
        match self.choices.as_deref() {
            None | Some([]) => Value::String(NO_RESPONSE_FALLBACK.to_string()),
            Some([first, ..]) => first
                .get("message")
                .and_then(|message| message.get("content"))
                .cloned()
                .unwrap_or(Value::Null),
        }
    }
}
