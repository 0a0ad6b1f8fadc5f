//! Configuration management for chatrelay
//!
//! Settings come from an optional TOML file, then the environment. The
//! upstream credential is environment-only and never read from or written to
//! the file.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the upstream credential
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";
/// Environment variable overriding `upstream.base_url`
pub const API_BASE_ENV: &str = "OPENROUTER_API_BASE";

/// Public OpenRouter endpoint used when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Upstream completion API settings
///
/// Fields are private; values are only produced by deserialization or
/// `UpstreamConfig::new` and checked by `Config::validate()`.
#[derive(Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(skip)]
    api_key: String,
    #[serde(default = "default_base_url")]
    base_url: String,
    #[serde(default = "default_model")]
    model: String,
    #[serde(default = "default_system_prompt")]
    system_prompt: String,
    #[serde(default = "default_temperature")]
    temperature: f64,
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,
    #[serde(default = "default_timeout")]
    timeout_seconds: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            system_prompt: default_system_prompt(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout(),
        }
    }
}

// Manual Debug so the credential never reaches logs
impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("system_prompt", &self.system_prompt)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl UpstreamConfig {
    /// Default settings pointed at `base_url` with the given credential
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: normalize_base_url(&base_url.into()),
            ..Self::default()
        }
    }

    /// Override the request timeout
    pub fn with_timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_system_prompt() -> String {
    "You are a helpful assistant.".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_timeout() -> u64 {
    30
}

/// Landing page and static asset locations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetsConfig {
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            template_dir: default_template_dir(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Values taken from the process environment
///
/// Kept as a plain value so tests can load configuration without touching
/// the real environment.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
}

impl EnvOverrides {
    /// Read overrides from the environment (call after `dotenvy::dotenv()`)
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV).ok(),
            api_base: std::env::var(API_BASE_ENV).ok(),
        }
    }
}

/// Strip trailing slashes so `{base_url}/chat/completions` never doubles up
fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

impl Config {
    /// Load configuration: optional TOML file, then environment, then validation
    ///
    /// Fails when the credential is missing, so the server never starts
    /// without one.
    pub fn load(path: Option<&Path>, env: &EnvOverrides) -> AppResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(env);
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file (no credential, no validation)
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| {
            AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            }
        })?;

        toml::from_str(&content).map_err(|source| AppError::ConfigParseFailed {
            path: path_display,
            source,
        })
    }

    /// Apply environment overrides on top of file/default values
    pub fn apply_env(&mut self, env: &EnvOverrides) {
        if let Some(key) = &env.api_key {
            self.upstream.api_key = key.trim().to_string();
        }
        if let Some(base) = env.api_base.as_deref().filter(|b| !b.trim().is_empty()) {
            self.upstream.base_url = base.to_string();
        }
        self.upstream.base_url = normalize_base_url(&self.upstream.base_url);
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> AppResult<()> {
        let upstream = &self.upstream;

        if upstream.api_key.is_empty() {
            return Err(AppError::MissingApiKey);
        }

        if !upstream.base_url.starts_with("http://") && !upstream.base_url.starts_with("https://")
        {
            return Err(AppError::Config(format!(
                "upstream.base_url '{}' must start with 'http://' or 'https://'",
                upstream.base_url
            )));
        }

        if upstream.model.trim().is_empty() {
            return Err(AppError::Config(
                "upstream.model cannot be empty".to_string(),
            ));
        }

        if !upstream.temperature.is_finite() || !(0.0..=2.0).contains(&upstream.temperature) {
            return Err(AppError::Config(format!(
                "upstream.temperature must be a finite number between 0.0 and 2.0, got {}",
                upstream.temperature
            )));
        }

        if upstream.max_tokens == 0 {
            return Err(AppError::Config(
                "upstream.max_tokens must be greater than 0".to_string(),
            ));
        }

        if upstream.timeout_seconds == 0 || upstream.timeout_seconds > 300 {
            return Err(AppError::Config(format!(
                "upstream.timeout_seconds must be between 1 and 300, got {}",
                upstream.timeout_seconds
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with_key() -> EnvOverrides {
        EnvOverrides {
            api_key: Some("sk-test".to_string()),
            api_base: None,
        }
    }

    fn parse(toml_str: &str) -> Config {
        toml::from_str(toml_str).expect("should parse config")
    }

    #[test]
    fn test_defaults_match_relay_contract() {
        let config = Config::load(None, &env_with_key()).expect("should load defaults");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.upstream.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.upstream.model(), "gpt-4o-mini");
        assert_eq!(config.upstream.system_prompt(), "You are a helpful assistant.");
        assert_eq!(config.upstream.temperature(), 0.7);
        assert_eq!(config.upstream.max_tokens(), 1024);
        assert_eq!(config.upstream.timeout_seconds(), 30);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_missing_api_key_fails_fast() {
        let result = Config::load(None, &EnvOverrides::default());
        assert!(matches!(result, Err(AppError::MissingApiKey)));
    }

    #[test]
    fn test_blank_api_key_fails_fast() {
        let env = EnvOverrides {
            api_key: Some("   ".to_string()),
            api_base: None,
        };
        assert!(matches!(
            Config::load(None, &env),
            Err(AppError::MissingApiKey)
        ));
    }

    #[test]
    fn test_env_base_url_overrides_file_and_is_normalized() {
        let mut config = parse(
            r#"
[upstream]
base_url = "https://example.com/v1"
"#,
        );
        config.apply_env(&EnvOverrides {
            api_key: Some("sk-test".to_string()),
            api_base: Some("http://localhost:8080/api/v1/".to_string()),
        });
        assert_eq!(config.upstream.base_url(), "http://localhost:8080/api/v1");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_env_base_url_is_ignored() {
        let mut config = Config::default();
        config.apply_env(&EnvOverrides {
            api_key: Some("sk-test".to_string()),
            api_base: Some(String::new()),
        });
        assert_eq!(config.upstream.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_api_key_is_not_read_from_file() {
        let config = parse(
            r#"
[upstream]
api_key = "sk-from-file"
"#,
        );
        assert_eq!(config.upstream.api_key(), "");
    }

    #[test]
    fn test_api_key_is_not_serialized() {
        let config = Config {
            upstream: UpstreamConfig::new("sk-secret", DEFAULT_BASE_URL),
            ..Config::default()
        };
        let rendered = toml::to_string(&config).expect("should serialize");
        assert!(!rendered.contains("sk-secret"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let upstream = UpstreamConfig::new("sk-secret", DEFAULT_BASE_URL);
        let rendered = format!("{:?}", upstream);
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_invalid_base_url_scheme_fails() {
        let mut config = parse(
            r#"
[upstream]
base_url = "openrouter.ai/api/v1"
"#,
        );
        config.apply_env(&env_with_key());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must start with"));
    }

    #[test]
    fn test_zero_timeout_fails() {
        let mut config = parse(
            r#"
[upstream]
timeout_seconds = 0
"#,
        );
        config.apply_env(&env_with_key());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_excessive_timeout_fails() {
        let mut config = parse(
            r#"
[upstream]
timeout_seconds = 301
"#,
        );
        config.apply_env(&env_with_key());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_temperature_out_of_range_fails() {
        let mut config = parse(
            r#"
[upstream]
temperature = 2.5
"#,
        );
        config.apply_env(&env_with_key());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn test_zero_max_tokens_fails() {
        let mut config = parse(
            r#"
[upstream]
max_tokens = 0
"#,
        );
        config.apply_env(&env_with_key());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_sections_use_defaults() {
        let config = parse(
            r#"
[server]
port = 8080
"#,
        );
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.assets.template_dir, PathBuf::from("templates"));
        assert_eq!(config.assets.static_dir, PathBuf::from("static"));
    }
}
