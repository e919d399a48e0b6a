//! Error types for the OpenAI client

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the chat completions API
#[derive(Error, Debug)]
pub enum OpenAiError {
    /// No API key configured
    #[error("OpenAI API key is required")]
    MissingApiKey,

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to serialize/deserialize JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API returned an error status
    #[error("OpenAI API error {status}: {message}")]
    Api { status: StatusCode, message: String },

    /// Request timeout
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Response parsed but carried no usable choice
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type for OpenAI operations
pub type OpenAiResult<T> = Result<T, OpenAiError>;
