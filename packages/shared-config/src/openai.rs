//! OpenAI model configuration types

use std::fmt;

use crate::{get_env_or_default, get_required_env, parse_env, ConfigResult};

/// Default OpenAI API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// OpenAI chat completion configuration
#[derive(Clone)]
pub struct OpenAiConfig {
    /// API key sent as a bearer token
    pub api_key: String,

    /// API base URL
    pub base_url: String,

    /// Chat model name
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum tokens for a completion
    pub max_tokens: u32,

    /// Temperature for generation (0.0 - 2.0)
    pub temperature: f32,
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl OpenAiConfig {
    /// Load OpenAI configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            api_key: get_required_env("OPENAI_API_KEY")?,
            base_url: get_env_or_default("OPENAI_BASE_URL", DEFAULT_BASE_URL),
            model: get_env_or_default("OPENAI_MODEL", DEFAULT_MODEL),
            timeout_secs: parse_env("OPENAI_TIMEOUT", 60)?,
            max_tokens: parse_env("OPENAI_MAX_TOKENS", 1024)?,
            temperature: parse_env("OPENAI_TEMPERATURE", 0.7)?,
        })
    }

    /// Create a configuration with the given key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 60,
            max_tokens: 1024,
            temperature: 0.7,
        }
    }

    /// Override the API base URL (useful for testing)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Get the full URL for the chat completions endpoint
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}
