//! Generation boundary - one round trip to a text model

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Output format the backend is asked for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Json,
    Text,
}

/// Per-call generation settings
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    /// `None` uses the client's configured model
    pub model: Option<String>,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub response_format: ResponseFormat,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: None,
            temperature: 0.7,
            max_output_tokens: 4096,
            response_format: ResponseFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    /// Sum of both counts, saturating at `u32::MAX`
    pub fn total(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// Raw generation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub content: String,
    pub usage: TokenUsage,
    /// Model that actually served the request
    pub model: String,
}

/// Text-generation backend
///
/// Implementations perform a single round trip. Any transport or backend
/// failure surfaces as [`DomainError::GenerationFailed`].
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Generation, DomainError>;
}
