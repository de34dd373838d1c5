//! Client side of the external music catalog API: credential caching,
//! single-track lookup and concurrent metadata enrichment.

mod client;
mod enrich;
mod token;

pub use client::{
    best_image_url, ApiAlbum, ApiArtist, ApiImage, ApiTrack, CatalogApi, CatalogApiError,
    ImageSize, SpotifyClient, DEFAULT_API_BASE,
};
pub use enrich::{EnrichedTrack, MetadataFetcher, TrackToEnrich, DEFAULT_CONCURRENCY};
pub use token::{
    AccessToken, AuthenticationError, HttpTokenTransport, TokenCache, TokenResponse,
    TokenTransport, DEFAULT_TOKEN_URL,
};
