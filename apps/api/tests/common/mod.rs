//! Common test utilities for API integration tests
//!
//! Builds the real router against mock Spotify and OpenAI servers and
//! provides small request/response helpers.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use songbot_api::routes::{app_router, ChatState};
use songbot_api::services::ChatService;
use songbot_openai_client::OpenAiClient;
use songbot_spotify_client::SpotifyClient;
use songbot_shared_config::{OpenAiConfig, SpotifyConfig};
use songbot_test_utils::{MockOpenAiServer, MockSpotifyServer};
use tower::ServiceExt;

/// Mock upstreams plus the router wired to them
pub struct TestApp {
    pub router: Router,
    pub openai: MockOpenAiServer,
    pub spotify: MockSpotifyServer,
}

impl TestApp {
    pub async fn start() -> Self {
        let openai = MockOpenAiServer::start().await;
        let spotify = MockSpotifyServer::start().await;

        let openai_client =
            OpenAiClient::new(&OpenAiConfig::new("sk-test").with_base_url(openai.url()))
                .expect("openai client");
        let spotify_client = SpotifyClient::new(
            &SpotifyConfig::new("client-id", "client-secret").with_base_url(spotify.url()),
        )
        .expect("spotify client");

        let router = app_router(ChatState::new(ChatService::new(
            openai_client,
            spotify_client,
        )));

        Self {
            router,
            openai,
            spotify,
        }
    }

    /// POST a JSON body and return status and raw body bytes
    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> (StatusCode, Vec<u8>) {
        self.post_raw(uri, body.to_string()).await
    }

    /// POST a raw string body with a JSON content type
    pub async fn post_raw(&self, uri: &str, body: String) -> (StatusCode, Vec<u8>) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }
}

/// Parse SSE text into `(event, data)` pairs, skipping comments
pub fn parse_sse(body: &[u8]) -> Vec<(String, serde_json::Value)> {
    let text = String::from_utf8_lossy(body);
    text.split("\n\n")
        .filter_map(|block| {
            let mut event = None;
            let mut data = None;
            for line in block.lines() {
                if let Some(name) = line.strip_prefix("event:") {
                    event = Some(name.trim().to_string());
                } else if let Some(payload) = line.strip_prefix("data:") {
                    data = serde_json::from_str(payload.trim()).ok();
                }
            }
            Some((event?, data?))
        })
        .collect()
}
