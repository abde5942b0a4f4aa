pub mod gemini;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use self::gemini::GeminiChatClient;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Upper bound on generated tokens; a full game document fits well inside it.
pub const MAX_OUTPUT_TOKENS: u32 = 8192;
pub const TEMPERATURE: f32 = 0.6;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request to model service failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("model service returned {status}: {message}")]
    Api {
        status: u16,
        message: String,
    },
    #[error("invalid model service configuration: {0}")]
    Config(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            max_output_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

/// One generation call: fixed system instruction plus a single user turn.
#[derive(Debug, Clone)]
pub struct GenerationPrompt {
    pub system_instruction: String,
    pub user_instruction: String,
    pub sampling: SamplingParams,
}

#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Returns every text segment of the model's answer, in order.
    async fn generate(&self, prompt: &GenerationPrompt) -> Result<Vec<String>, LlmError>;

    fn get_model(&self) -> String;
}

/// Treats an unset or whitespace-only override as absent.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn GenerationClient>, LlmError> {
    let client = GeminiChatClient::from_config(config)?;
    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_overrides_are_absent() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("")), None);
        assert_eq!(non_blank(Some("  \t")), None);
        assert_eq!(non_blank(Some("gemini-2.5-pro")), Some("gemini-2.5-pro"));
    }
}
