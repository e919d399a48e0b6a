//! Spotify catalog client for Songbot
//!
//! This crate wraps the Spotify Web API client-credentials flow and track
//! search, exposing three query helpers:
//! - Song recommendations from comma-separated interests (searched as genres)
//! - Songs by an artist
//! - Songs in a language
//!
//! # Example
//!
//! ```rust,no_run
//! use songbot_shared_config::SpotifyConfig;
//! use songbot_spotify_client::SpotifyClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SpotifyClient::new(&SpotifyConfig::from_env()?)?;
//!
//! for track in client.get_song_recommendations("workout, study").await? {
//!     println!("{} - {} ({})", track.name, track.artist, track.url);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Environment Variables
//!
//! - `SPOTIFY_CLIENT_API_KEY`: client id (required)
//! - `SPOTIFY_SECERET_API_KEY`: client secret (required)

mod client;
mod error;
mod models;
mod query;

pub use client::SpotifyClient;
pub use error::{SpotifyError, SpotifyResult};
pub use models::TrackRecord;
pub use query::SearchQuery;
