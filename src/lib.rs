//! chatrelay - minimal chat relay to an OpenAI-compatible completion API
//!
//! Accepts `POST /chat` with `{"message": ...}`, forwards it as a
//! single-turn completion request to the configured upstream (OpenRouter by
//! default) and relays the first choice back, normalizing every failure into
//! a `{"error": <kind>, ...}` envelope.

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod telemetry;
pub mod upstream;
