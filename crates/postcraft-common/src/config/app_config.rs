//! Application configuration structs
//!
//! Loads configuration from environment variables, with `.env` support.

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub generation: GenerationConfig,
    pub audit: AuditConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Generation backend configuration (OpenAI-compatible chat completions)
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Audit recording configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// Source texts longer than this many chars are truncated before prompting
    #[serde(default = "default_max_source_chars")]
    pub max_source_chars: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            max_source_chars: default_max_source_chars(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "postcraft".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    4096
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_source_chars() -> usize {
    15_000
}

/// Parse an optional variable, failing on present-but-invalid values
fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: impl FnOnce() -> T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default()),
    }
}

fn require_var(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<String, ConfigError> {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingVar(key))
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or a
    /// numeric variable does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let temperature: f32 = parse_var(&lookup, "GENERATION_TEMPERATURE", default_temperature)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidValue(
                "GENERATION_TEMPERATURE",
                temperature.to_string(),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: require_var(&lookup, "DATABASE_URL")?,
                max_connections: parse_var(
                    &lookup,
                    "DATABASE_MAX_CONNECTIONS",
                    default_max_connections,
                )?,
                min_connections: parse_var(
                    &lookup,
                    "DATABASE_MIN_CONNECTIONS",
                    default_min_connections,
                )?,
            },
            generation: GenerationConfig {
                api_key: require_var(&lookup, "OPENAI_API_KEY")?,
                base_url: lookup("OPENAI_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(default_base_url),
                model: lookup("GENERATION_MODEL").unwrap_or_else(default_model),
                temperature,
                max_output_tokens: parse_var(
                    &lookup,
                    "GENERATION_MAX_OUTPUT_TOKENS",
                    default_max_output_tokens,
                )?,
                timeout_secs: parse_var(&lookup, "GENERATION_TIMEOUT_SECS", default_timeout_secs)?,
            },
            audit: AuditConfig {
                max_source_chars: parse_var(
                    &lookup,
                    "AUDIT_MAX_SOURCE_CHARS",
                    default_max_source_chars,
                )?,
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
