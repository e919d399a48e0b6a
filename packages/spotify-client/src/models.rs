//! Spotify API response models

use serde::{Deserialize, Serialize};

use crate::error::SpotifyError;

/// A normalized catalog search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRecord {
    /// Track title
    pub name: String,
    /// Name of the first credited artist
    pub artist: String,
    /// Public Spotify URL for the track
    pub url: String,
    /// First album image URL, empty if the album has no images
    pub image_url: String,
    /// Web API reference link for the track (`href`), not a `spotify:` URI
    pub uri: String,
}

// Internal response types for deserialization

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub tracks: TracksPage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TracksPage {
    pub items: Vec<RawTrack>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTrack {
    pub name: String,
    pub artists: Vec<RawArtist>,
    pub external_urls: RawExternalUrls,
    pub album: RawAlbum,
    pub href: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawArtist {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawExternalUrls {
    pub spotify: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAlbum {
    #[serde(default)]
    pub images: Vec<RawImage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawImage {
    pub url: String,
}

impl TryFrom<RawTrack> for TrackRecord {
    type Error = SpotifyError;

    fn try_from(raw: RawTrack) -> Result<Self, Self::Error> {
        let artist = raw
            .artists
            .into_iter()
            .next()
            .map(|a| a.name)
            .ok_or_else(|| {
                SpotifyError::MalformedResponse(format!("track '{}' has no artists", raw.name))
            })?;

        let image_url = raw
            .album
            .images
            .into_iter()
            .next()
            .map(|image| image.url)
            .unwrap_or_default();

        Ok(Self {
            name: raw.name,
            artist,
            url: raw.external_urls.spotify,
            image_url,
            uri: raw.href,
        })
    }
}

/// Spotify API error body, `{"error": {"status": 400, "message": "..."}}`
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    pub message: String,
}
