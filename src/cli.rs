//! Command-line interface for chatrelay
//!
//! Provides argument parsing and subcommand handling for the chatrelay binary.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Minimal chat relay to an OpenAI-compatible completion API
#[derive(Parser)]
#[command(name = "chatrelay")]
#[command(version)]
#[command(about = "Minimal chat relay to an OpenAI-compatible completion API")]
#[command(
    long_about = "chatrelay serves a landing page and a POST /chat endpoint that forwards \
    each message to an OpenAI-compatible completion API (OpenRouter by default). \
    The API key is read from OPENROUTER_API_KEY (a .env file is honored)."
)]
pub struct Cli {
    /// Path to configuration file (defaults to ./config.toml if it exists)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl Cli {
    /// Config file to load, if any
    ///
    /// An explicit `--config` is always returned (a missing file is then an
    /// error); otherwise `config.toml` is used only when present.
    pub fn config_path(&self) -> Option<PathBuf> {
        match &self.config {
            Some(path) => Some(path.clone()),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                default.exists().then(|| default.to_path_buf())
            }
        }
    }
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# chatrelay Configuration
# ========================
#
# Every setting is optional; the values below are the defaults.
# The API key is NOT read from this file. Set OPENROUTER_API_KEY in the
# environment or in a .env file next to the binary.

# ─────────────────────────────────────────────────────────────────────────────
# SERVER
# ─────────────────────────────────────────────────────────────────────────────

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "127.0.0.1"

# Port to listen on
port = 5000

# ─────────────────────────────────────────────────────────────────────────────
# UPSTREAM COMPLETION API
# ─────────────────────────────────────────────────────────────────────────────

[upstream]
# OpenAI-compatible base URL; requests go to {base_url}/chat/completions.
# OPENROUTER_API_BASE overrides this value.
base_url = "https://openrouter.ai/api/v1"

# Model identifier sent with every request
model = "gpt-4o-mini"

# System message placed before the user's message
system_prompt = "You are a helpful assistant."

# Sampling temperature (0.0-2.0)
temperature = 0.7

# Maximum output tokens
max_tokens = 1024

# Total time allowed for one upstream call, in seconds (1-300). No retries.
timeout_seconds = 30

# ─────────────────────────────────────────────────────────────────────────────
# ASSETS
# ─────────────────────────────────────────────────────────────────────────────

[assets]
# Directory holding index.html (served at /)
template_dir = "templates"

# Directory served under /static
static_dir = "static"

# ─────────────────────────────────────────────────────────────────────────────
# OBSERVABILITY
# ─────────────────────────────────────────────────────────────────────────────

[observability]
# Log level: "trace", "debug", "info", "warn", "error" (RUST_LOG overrides)
log_level = "info"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_runs_server() {
        let cli = Cli::parse_from(["chatrelay"]);
        assert!(cli.config.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn explicit_config_path_is_kept() {
        let cli = Cli::parse_from(["chatrelay", "--config", "/nonexistent/custom.toml"]);
        assert_eq!(
            cli.config_path(),
            Some(PathBuf::from("/nonexistent/custom.toml"))
        );
    }

    #[test]
    fn config_subcommand() {
        let cli = Cli::parse_from(["chatrelay", "config"]);
        assert!(matches!(
            cli.command,
            Some(Command::Config { output: None })
        ));
    }

    #[test]
    fn config_subcommand_with_output() {
        let cli = Cli::parse_from(["chatrelay", "config", "-o", "my-config.toml"]);
        assert!(matches!(
            cli.command,
            Some(Command::Config { output: Some(ref path) }) if path == "my-config.toml"
        ));
    }

    #[test]
    fn template_is_valid_toml() {
        let result: Result<toml::Value, _> = toml::from_str(generate_config_template());
        assert!(
            result.is_ok(),
            "Template should be valid TOML: {:?}",
            result.err()
        );
    }

    #[test]
    fn template_has_all_sections() {
        let template = generate_config_template();
        assert!(template.contains("[server]"));
        assert!(template.contains("[upstream]"));
        assert!(template.contains("[assets]"));
        assert!(template.contains("[observability]"));
        assert!(!template.contains("api_key ="));
    }
}
