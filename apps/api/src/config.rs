//! API server configuration

use std::env;

use anyhow::{Context, Result};
use songbot_shared_config::{CommonConfig, Environment, OpenAiConfig, SpotifyConfig};

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Common configuration shared with the service clients
    pub common: CommonConfig,

    /// Server port (default: 8080)
    pub port: u16,

    /// CORS allowed origins (optional)
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Requires `OPENAI_API_KEY`, `SPOTIFY_CLIENT_API_KEY` and
    /// `SPOTIFY_SECERET_API_KEY`; everything else has a default.
    pub fn from_env() -> Result<Self> {
        let common = CommonConfig::from_env().context("Failed to load config")?;

        Ok(Self {
            common,

            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid PORT value")?,

            cors_allowed_origins: env::var("CORS_ORIGINS")
                .ok()
                .map(|s| Self::parse_origins(&s)),
        })
    }

    /// Split a comma-separated origin list, dropping blanks
    fn parse_origins(value: &str) -> Vec<String> {
        value
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    // Convenience accessors for common config fields

    /// Get Spotify configuration
    pub fn spotify(&self) -> &SpotifyConfig {
        &self.common.spotify
    }

    /// Get OpenAI configuration
    pub fn openai(&self) -> &OpenAiConfig {
        &self.common.openai
    }

    /// Get environment mode
    pub fn environment(&self) -> Environment {
        self.common.environment
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.common.environment.is_production()
    }
}
