//! Spotify Web API client implementation

use std::fmt;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use songbot_shared_config::SpotifyConfig;
use tracing::{debug, instrument, warn};

use crate::error::{SpotifyError, SpotifyResult};
use crate::models::{ErrorResponse, SearchResponse, TokenResponse, TrackRecord};
use crate::query::SearchQuery;

/// Maximum error body size kept in error messages
const MAX_ERROR_BODY_SIZE: usize = 1000;

/// Default connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Spotify catalog client using the client-credentials flow
///
/// Every query fetches a fresh access token; nothing is cached between calls.
#[derive(Clone)]
pub struct SpotifyClient {
    http_client: Client,
    config: SpotifyConfig,
}

impl fmt::Debug for SpotifyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyClient")
            .field("config", &self.config)
            .finish()
    }
}

impl SpotifyClient {
    /// Create a new Spotify client from configuration
    ///
    /// # Errors
    /// Returns `SpotifyError::MissingCredentials` if the client id or secret is empty
    pub fn new(config: &SpotifyConfig) -> SpotifyResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .pool_max_idle_per_host(5)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent("Songbot/1.0")
            .build()?;

        Self::with_client(config, http_client)
    }

    /// Create a client with a custom HTTP client (for testing)
    pub fn with_client(config: &SpotifyConfig, http_client: Client) -> SpotifyResult<Self> {
        if config.client_id.is_empty() || config.client_secret.is_empty() {
            return Err(SpotifyError::MissingCredentials);
        }

        Ok(Self {
            http_client,
            config: config.clone(),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &SpotifyConfig {
        &self.config
    }

    fn basic_auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.config.client_id, self.config.client_secret);
        format!("Basic {}", STANDARD.encode(credentials))
    }

    /// Truncate an upstream error body to `MAX_ERROR_BODY_SIZE` bytes on a char boundary
    fn truncate_error_body(body: String) -> String {
        if body.len() <= MAX_ERROR_BODY_SIZE {
            return body;
        }

        let truncate_at = body
            .char_indices()
            .map(|(i, _)| i)
            .take_while(|i| *i <= MAX_ERROR_BODY_SIZE)
            .last()
            .unwrap_or(0);

        format!("{}... (truncated)", &body[..truncate_at])
    }

    /// Exchange the client credentials for a bearer token
    ///
    /// One outbound call per invocation, no retry.
    ///
    /// # Errors
    /// - `SpotifyError::TokenFetchFailed` - If the token endpoint answers non-2xx
    /// - `SpotifyError::Http` / `SpotifyError::Timeout` - On transport failure
    /// - `SpotifyError::Parse` - If the body has no `access_token`
    #[instrument(skip(self))]
    pub async fn get_access_token(&self) -> SpotifyResult<String> {
        let response = self
            .http_client
            .post(self.config.token_url())
            .header(AUTHORIZATION, self.basic_auth_header())
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(SpotifyError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Spotify token request rejected");
            return Err(SpotifyError::TokenFetchFailed { status });
        }

        let text = response.text().await.map_err(SpotifyError::from_transport)?;
        let token: TokenResponse = serde_json::from_str(&text)?;

        debug!("Obtained Spotify access token");
        Ok(token.access_token)
    }

    /// Run one catalog search and normalize the first page of tracks
    ///
    /// # Errors
    /// - Any token error from [`Self::get_access_token`]
    /// - `SpotifyError::Api` - If the search endpoint answers non-2xx
    /// - `SpotifyError::Parse` - If the body is not a search result
    /// - `SpotifyError::MalformedResponse` - If a track has no artists
    #[instrument(skip(self), fields(kind = query.kind()))]
    pub async fn search_tracks(&self, query: &SearchQuery) -> SpotifyResult<Vec<TrackRecord>> {
        let token = self.get_access_token().await?;

        // Built by hand so the already-encoded `q` value is not encoded twice
        let url = format!(
            "{}?q={}&type=track&limit={}",
            self.config.search_url(),
            query.q_param(),
            self.config.search_limit
        );

        debug!(clause = %query, "Searching Spotify catalog");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(SpotifyError::from_transport)?;

        let status = response.status();
        let text = response.text().await.map_err(SpotifyError::from_transport)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| Self::truncate_error_body(text));
            warn!(status = %status, message = %message, "Spotify search failed");
            return Err(SpotifyError::Api { status, message });
        }

        let response: SearchResponse = serde_json::from_str(&text)?;

        let tracks = response
            .tracks
            .items
            .into_iter()
            .map(TrackRecord::try_from)
            .collect::<SpotifyResult<Vec<_>>>()?;

        debug!(result_count = tracks.len(), "Spotify search complete");

        Ok(tracks)
    }

    /// Tracks matching comma-separated interests, each treated as a genre
    pub async fn get_song_recommendations(&self, interests: &str) -> SpotifyResult<Vec<TrackRecord>> {
        self.search_tracks(&SearchQuery::Interests(interests.to_string()))
            .await
    }

    /// Tracks by the named artist
    pub async fn get_artist_songs(&self, artist: &str) -> SpotifyResult<Vec<TrackRecord>> {
        self.search_tracks(&SearchQuery::Artist(artist.to_string()))
            .await
    }

    /// Tracks in the given language
    pub async fn get_language_recommendations(
        &self,
        language: &str,
    ) -> SpotifyResult<Vec<TrackRecord>> {
        self.search_tracks(&SearchQuery::Language(language.to_string()))
            .await
    }
}
