//! Trackmatch Recommendation Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod artifacts;
pub mod catalog;
pub mod config;
pub mod recommender;
pub mod server;

// Re-export commonly used types for convenience
pub use artifacts::{ArtifactPaths, ArtifactStore, TrainedArtifacts};
pub use catalog::{CatalogApi, MetadataFetcher, SpotifyClient, TokenCache};
pub use recommender::{RecommendError, RecommendationEngine};
pub use server::{build_router, run_server, ServerState};
