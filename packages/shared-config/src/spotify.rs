//! Spotify catalog configuration types

use std::fmt;

use crate::{get_env_or_default, get_required_env, parse_env, ConfigError, ConfigResult};

/// Default accounts service base URL (token endpoint host)
pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";

/// Default Web API base URL (search endpoint host)
pub const DEFAULT_API_URL: &str = "https://api.spotify.com";

/// Default number of tracks per search
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Largest page size the search endpoint accepts
pub const MAX_SEARCH_LIMIT: u32 = 50;

/// Spotify client-credentials configuration
#[derive(Clone)]
pub struct SpotifyConfig {
    /// OAuth client id
    pub client_id: String,

    /// OAuth client secret
    pub client_secret: String,

    /// Accounts service base URL
    pub accounts_url: String,

    /// Web API base URL
    pub api_url: String,

    /// Number of tracks requested per search
    pub search_limit: u32,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl fmt::Debug for SpotifyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyConfig")
            .field("client_id", &"[REDACTED]")
            .field("client_secret", &"[REDACTED]")
            .field("accounts_url", &self.accounts_url)
            .field("api_url", &self.api_url)
            .field("search_limit", &self.search_limit)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SpotifyConfig {
    /// Load Spotify configuration from environment variables
    ///
    /// `SPOTIFY_CLIENT_API_KEY` holds the client id and `SPOTIFY_SECERET_API_KEY`
    /// the client secret. `SPOTIFY_CLIENT_SECRET` is accepted as a fallback
    /// for the secret.
    pub fn from_env() -> ConfigResult<Self> {
        let client_id = get_required_env("SPOTIFY_CLIENT_API_KEY")?;
        let client_secret = get_required_env("SPOTIFY_SECERET_API_KEY")
            .or_else(|_| get_required_env("SPOTIFY_CLIENT_SECRET"))
            .map_err(|_| ConfigError::MissingEnvVar("SPOTIFY_SECERET_API_KEY".to_string()))?;

        Ok(Self {
            client_id,
            client_secret,
            accounts_url: get_env_or_default("SPOTIFY_ACCOUNTS_URL", DEFAULT_ACCOUNTS_URL),
            api_url: get_env_or_default("SPOTIFY_API_URL", DEFAULT_API_URL),
            search_limit: parse_search_limit()?,
            timeout_secs: parse_env("SPOTIFY_TIMEOUT", 10)?,
        })
    }

    /// Create a configuration with the given credentials and default endpoints
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            accounts_url: DEFAULT_ACCOUNTS_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            search_limit: DEFAULT_SEARCH_LIMIT,
            timeout_secs: 10,
        }
    }

    /// Point both the accounts and API hosts at one base URL (useful for testing)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.accounts_url = url.clone();
        self.api_url = url;
        self
    }

    /// Get the full URL for the token endpoint
    pub fn token_url(&self) -> String {
        format!("{}/api/token", self.accounts_url.trim_end_matches('/'))
    }

    /// Get the full URL for the search endpoint
    pub fn search_url(&self) -> String {
        format!("{}/v1/search", self.api_url.trim_end_matches('/'))
    }
}

/// `SPOTIFY_SEARCH_LIMIT` must be within `1..=MAX_SEARCH_LIMIT`
fn parse_search_limit() -> ConfigResult<u32> {
    let limit = parse_env("SPOTIFY_SEARCH_LIMIT", DEFAULT_SEARCH_LIMIT)?;
    if !(1..=MAX_SEARCH_LIMIT).contains(&limit) {
        return Err(ConfigError::InvalidValue(
            "SPOTIFY_SEARCH_LIMIT".to_string(),
            format!("{} is outside 1..={}", limit, MAX_SEARCH_LIMIT),
        ));
    }
    Ok(limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use songbot_test_utils::EnvGuard;

    #[test]
    fn test_default_endpoint_urls() {
        let config = SpotifyConfig::new("id", "secret");
        assert_eq!(config.token_url(), "https://accounts.spotify.com/api/token");
        assert_eq!(config.search_url(), "https://api.spotify.com/v1/search");
        assert_eq!(config.search_limit, 10);
    }

    #[test]
    fn test_with_base_url_trailing_slash() {
        let config = SpotifyConfig::new("id", "secret").with_base_url("http://127.0.0.1:9000/");
        assert_eq!(config.token_url(), "http://127.0.0.1:9000/api/token");
        assert_eq!(config.search_url(), "http://127.0.0.1:9000/v1/search");
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let config = SpotifyConfig::new("my-client-id", "my-client-secret");
        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("my-client-id"));
        assert!(!debug_str.contains("my-client-secret"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_from_env_secret_fallback() {
        let _guard = EnvGuard::new(
            &[
                ("SPOTIFY_CLIENT_API_KEY", "id"),
                ("SPOTIFY_CLIENT_SECRET", "fallback-secret"),
            ],
            &["SPOTIFY_SECERET_API_KEY", "SPOTIFY_SEARCH_LIMIT"],
        );
        let config = SpotifyConfig::from_env().unwrap();
        assert_eq!(config.client_secret, "fallback-secret");
        assert_eq!(config.search_limit, 10);
    }

    #[test]
    fn test_from_env_missing_secret() {
        let _guard = EnvGuard::new(
            &[("SPOTIFY_CLIENT_API_KEY", "id")],
            &["SPOTIFY_SECERET_API_KEY", "SPOTIFY_CLIENT_SECRET"],
        );
        let result = SpotifyConfig::from_env();
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(name)) if name == "SPOTIFY_SECERET_API_KEY")
        );
    }

    #[test]
    fn test_from_env_missing_client_id() {
        let _guard = EnvGuard::new(&[], &["SPOTIFY_CLIENT_API_KEY"]);
        let result = SpotifyConfig::from_env();
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(name)) if name == "SPOTIFY_CLIENT_API_KEY")
        );
    }

    #[test]
    fn test_from_env_search_limit_bounds() {
        let required = [
            ("SPOTIFY_CLIENT_API_KEY", "id"),
            ("SPOTIFY_SECERET_API_KEY", "secret"),
        ];

        for bad in ["0", "51"] {
            let mut set = required.to_vec();
            set.push(("SPOTIFY_SEARCH_LIMIT", bad));
            let _guard = EnvGuard::new(&set, &[]);
            assert!(matches!(
                SpotifyConfig::from_env(),
                Err(ConfigError::InvalidValue(name, _)) if name == "SPOTIFY_SEARCH_LIMIT"
            ));
        }

        let mut set = required.to_vec();
        set.push(("SPOTIFY_SEARCH_LIMIT", "50"));
        let _guard = EnvGuard::new(&set, &[]);
        assert_eq!(SpotifyConfig::from_env().unwrap().search_limit, 50);
    }
}
