//! Shared test utilities for Songbot workspace
//!
//! Mock implementations of the two upstream services so client and API tests
//! run without network access.
//!
//! # Mock Services
//!
//! - [`MockSpotifyServer`] - Spotify token and search endpoints
//! - [`MockOpenAiServer`] - OpenAI chat completions endpoint
//!
//! [`EnvGuard`] serializes tests that change environment variables.
//!
//! # Example
//!
//! ```rust,ignore
//! use songbot_test_utils::{MockOpenAiServer, MockSpotifyServer};
//!
//! #[tokio::test]
//! async fn test_with_mocks() {
//!     let spotify = MockSpotifyServer::start().await;
//!     spotify.mock_token_success().await;
//!
//!     let openai = MockOpenAiServer::start().await;
//!     openai.mock_text_reply("Hi!").await;
//!
//!     // Use spotify.url() and openai.url() to configure your clients
//! }
//! ```

mod env;
mod openai;
mod spotify;

pub use env::EnvGuard;
pub use openai::MockOpenAiServer;
pub use spotify::{track_json, MockSpotifyServer};
