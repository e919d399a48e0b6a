//! Mock Spotify server for testing catalog searches
//!
//! Provides a [`MockSpotifyServer`] that serves both the accounts token
//! endpoint and the Web API search endpoint from one address.

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Access token handed out by [`MockSpotifyServer::mock_token_success`]
pub const MOCK_ACCESS_TOKEN: &str = "mock-spotify-token";

/// Build a raw search item as Spotify returns it
///
/// The id is derived from the name, so `url` becomes
/// `https://open.spotify.com/track/<id>` and `href`
/// `https://api.spotify.com/v1/tracks/<id>`.
pub fn track_json(name: &str, artist: &str, images: &[&str]) -> Value {
    let id: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();

    json!({
        "name": name,
        "artists": [{ "name": artist }],
        "external_urls": { "spotify": format!("https://open.spotify.com/track/{}", id) },
        "album": {
            "images": images.iter().map(|url| json!({ "url": url, "height": 640, "width": 640 })).collect::<Vec<_>>()
        },
        "href": format!("https://api.spotify.com/v1/tracks/{}", id),
        "uri": format!("spotify:track:{}", id)
    })
}

/// Mock Spotify server
///
/// Point `SpotifyConfig::with_base_url` at [`MockSpotifyServer::url`].
pub struct MockSpotifyServer {
    server: MockServer,
}

impl MockSpotifyServer {
    /// Start a new mock Spotify server
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Get the server URL
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Mount a token endpoint that always succeeds
    pub async fn mock_token_success(&self) {
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": MOCK_ACCESS_TOKEN,
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a token endpoint that rejects the credentials with `status_code`
    pub async fn mock_token_failure(&self, status_code: u16) {
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(status_code).set_body_json(json!({
                "error": "invalid_client"
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a search endpoint returning `items` for any query
    pub async fn mock_search_tracks(&self, items: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": {
                    "href": "https://api.spotify.com/v1/search",
                    "items": items,
                    "limit": 10,
                    "offset": 0
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a search endpoint that fails with `status_code`
    pub async fn mock_search_failure(&self, status_code: u16, message: &str) {
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(status_code).set_body_json(json!({
                "error": { "status": status_code, "message": message }
            })))
            .mount(&self.server)
            .await;
    }

    /// Number of requests received for `request_path`
    pub async fn calls_to(&self, request_path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == request_path)
            .count()
    }

    /// Number of token requests received
    pub async fn token_calls(&self) -> usize {
        self.calls_to("/api/token").await
    }

    /// Number of search requests received
    pub async fn search_calls(&self) -> usize {
        self.calls_to("/v1/search").await
    }

    /// Get reference to the underlying mock server for custom mock setups
    pub fn inner(&self) -> &MockServer {
        &self.server
    }
}
