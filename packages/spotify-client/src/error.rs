//! Spotify API error types

use reqwest::StatusCode;
use thiserror::Error;

/// Spotify client errors
#[derive(Error, Debug)]
pub enum SpotifyError {
    /// Client id or secret is missing
    #[error("client id and secret are required for Spotify API access")]
    MissingCredentials,

    /// The token endpoint answered with a non-success status
    #[error("token fetch failed with status {status}")]
    TokenFetchFailed { status: StatusCode },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("failed to parse Spotify response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response parsed but lacks a field every track must have
    #[error("malformed Spotify response: {0}")]
    MalformedResponse(String),

    /// Spotify API returned an error status
    #[error("Spotify API error {status}: {message}")]
    Api { status: StatusCode, message: String },

    /// Request timeout
    #[error("request to Spotify timed out")]
    Timeout,
}

impl SpotifyError {
    /// Map a transport error, separating timeouts from other failures
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SpotifyError::Timeout
        } else {
            SpotifyError::Http(err)
        }
    }

    /// Check if this error came from the token exchange rather than the search
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            SpotifyError::MissingCredentials | SpotifyError::TokenFetchFailed { .. }
        )
    }
}

/// Result type for Spotify operations
pub type SpotifyResult<T> = Result<T, SpotifyError>;
