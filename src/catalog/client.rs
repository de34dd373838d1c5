//! Single-track lookup against the catalog API.

use super::token::{AuthenticationError, TokenCache};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://api.spotify.com";

const TRACK_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum CatalogApiError {
    #[error(transparent)]
    Auth(#[from] AuthenticationError),

    #[error("failed to fetch track {id}: {reason}")]
    Request { id: String, reason: String },

    #[error("track {id} lookup returned status {status}")]
    Status { id: String, status: u16 },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiImage {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiArtist {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiAlbum {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub images: Vec<ApiImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiTrack {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ApiArtist>,
    #[serde(default)]
    pub album: ApiAlbum,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

impl ApiTrack {
    /// Artist names joined for display.
    pub fn joined_artists(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Canonical external link to the track, when the catalog provides one.
    pub fn spotify_url(&self) -> Option<&str> {
        self.external_urls.get("spotify").map(String::as_str)
    }
}

/// Requested cover-art size class.
///
/// The catalog returns image variants largest-first, so the preferred index
/// is 0 for large, 1 for medium and 2 for small.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Small,
    Medium,
    Large,
}

impl ImageSize {
    fn preferred_index(self) -> usize {
        match self {
            ImageSize::Small => 2,
            ImageSize::Medium => 1,
            ImageSize::Large => 0,
        }
    }
}

/// Pick the best cover image URL for the requested size class, falling back
/// to the largest variant when the preferred one is missing.
pub fn best_image_url(images: &[ApiImage], size: ImageSize) -> Option<String> {
    images
        .get(size.preferred_index())
        .or_else(|| images.first())
        .map(|image| image.url.clone())
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn get_track(&self, id: &str) -> Result<ApiTrack, CatalogApiError>;
}

/// Production catalog client: bearer-authenticated `GET /v1/tracks/{id}`.
pub struct SpotifyClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<TokenCache>,
}

impl SpotifyClient {
    pub fn new(base_url: &str, tokens: Arc<TokenCache>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(TRACK_REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }
}

#[async_trait]
impl CatalogApi for SpotifyClient {
    async fn get_track(&self, id: &str) -> Result<ApiTrack, CatalogApiError> {
        let token = self.tokens.access_token().await?;

        let url = format!("{}/v1/tracks/{}", self.base_url, id);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| CatalogApiError::Request {
                id: id.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(CatalogApiError::Status {
                id: id.to_string(),
                status: response.status().as_u16(),
            });
        }

        response
            .json::<ApiTrack>()
            .await
            .map_err(|e| CatalogApiError::Request {
                id: id.to_string(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(n: usize) -> Vec<ApiImage> {
        (0..n)
            .map(|i| ApiImage {
                url: format!("https://img.example/{i}"),
                width: None,
                height: None,
            })
            .collect()
    }

    #[test]
    fn test_small_prefers_index_two() {
        let urls = images(3);
        assert_eq!(
            best_image_url(&urls, ImageSize::Small).as_deref(),
            Some("https://img.example/2")
        );
        assert_eq!(
            best_image_url(&urls, ImageSize::Medium).as_deref(),
            Some("https://img.example/1")
        );
        assert_eq!(
            best_image_url(&urls, ImageSize::Large).as_deref(),
            Some("https://img.example/0")
        );
    }

    #[test]
    fn test_out_of_range_preference_falls_back_to_first() {
        let urls = images(1);
        assert_eq!(
            best_image_url(&urls, ImageSize::Small).as_deref(),
            Some("https://img.example/0")
        );
    }

    #[test]
    fn test_empty_image_list_yields_none() {
        assert_eq!(best_image_url(&[], ImageSize::Medium), None);
    }

    #[test]
    fn test_joined_artists() {
        let track: ApiTrack = serde_json::from_str(
            r#"{
                "id": "t1",
                "name": "Song",
                "artists": [{"name": "First"}, {"name": "Second"}],
                "external_urls": {"spotify": "https://open.spotify.com/track/t1"}
            }"#,
        )
        .unwrap();

        assert_eq!(track.joined_artists(), "First, Second");
        assert_eq!(
            track.spotify_url(),
            Some("https://open.spotify.com/track/t1")
        );
    }

    #[test]
    fn test_track_parses_with_missing_optional_fields() {
        let track: ApiTrack = serde_json::from_str(r#"{"id": "t2"}"#).unwrap();
        assert_eq!(track.joined_artists(), "");
        assert!(track.spotify_url().is_none());
        assert!(track.album.images.is_empty());
    }
}
