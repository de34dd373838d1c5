//! Concurrent metadata enrichment.
//!
//! Fans a batch of track identifiers out to the catalog API with bounded
//! parallelism and collects results as they complete. One failed lookup
//! never fails the batch: the aggregator substitutes a sentinel record and
//! moves on.

use super::client::{best_image_url, ApiTrack, CatalogApi, ImageSize};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// How many lookups run simultaneously. Keeps total batch latency near
/// `ceil(N / concurrency)` round trips while respecting the catalog's
/// implicit rate limits.
pub const DEFAULT_CONCURRENCY: usize = 5;

const UNKNOWN_TITLE: &str = "Unknown";
const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// A track identifier plus display fallbacks from the reference dataset.
#[derive(Debug, Clone)]
pub struct TrackToEnrich {
    pub id: String,
    pub genres: Option<String>,
}

/// Display metadata for one track, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedTrack {
    pub title: String,
    pub artist: String,
    pub genres: String,
    pub image_url: Option<String>,
    pub spotify_url: Option<String>,
}

impl EnrichedTrack {
    /// The sentinel substituted when a single lookup fails.
    fn unknown(genres: String) -> Self {
        Self {
            title: UNKNOWN_TITLE.to_string(),
            artist: UNKNOWN_ARTIST.to_string(),
            genres,
            image_url: None,
            spotify_url: None,
        }
    }
}

pub struct MetadataFetcher {
    api: Arc<dyn CatalogApi>,
    concurrency: usize,
    image_size: ImageSize,
}

impl MetadataFetcher {
    pub fn new(api: Arc<dyn CatalogApi>, concurrency: usize) -> Self {
        Self {
            api,
            concurrency: concurrency.max(1),
            image_size: ImageSize::Medium,
        }
    }

    /// Fetch display metadata for every track in the batch.
    ///
    /// Always returns exactly one record per input. Output order follows
    /// completion, not input order. The call completes only when every
    /// lookup has finished or failed; there is no batch-level cancellation.
    pub async fn enrich(&self, tracks: &[TrackToEnrich]) -> Vec<EnrichedTrack> {
        let fetched: Vec<(TrackToEnrich, Result<ApiTrack, _>)> = stream::iter(tracks.to_vec())
            .map(|track| {
                let api = self.api.clone();
                async move {
                    let result = api.get_track(&track.id).await;
                    (track, result)
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        fetched
            .into_iter()
            .map(|(track, result)| match result {
                Ok(api_track) => self.to_enriched(&track, api_track),
                Err(e) => {
                    warn!("Enrichment failed for track {}: {}", track.id, e);
                    EnrichedTrack::unknown(track.genres.unwrap_or_default())
                }
            })
            .collect()
    }

    fn to_enriched(&self, track: &TrackToEnrich, api_track: ApiTrack) -> EnrichedTrack {
        let title = if api_track.name.is_empty() {
            UNKNOWN_TITLE.to_string()
        } else {
            api_track.name.clone()
        };
        let artist = match api_track.joined_artists() {
            s if s.is_empty() => UNKNOWN_ARTIST.to_string(),
            s => s,
        };
        EnrichedTrack {
            title,
            artist,
            genres: track.genres.clone().unwrap_or_default(),
            image_url: best_image_url(&api_track.album.images, self.image_size),
            spotify_url: api_track.spotify_url().map(str::to_string),
        }
    }
}
