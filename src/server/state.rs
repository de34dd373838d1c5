use crate::artifacts::TrainedArtifacts;
use crate::catalog::MetadataFetcher;
use crate::recommender::RecommendationEngine;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct ServerState {
    pub artifacts: Arc<TrainedArtifacts>,
    pub engine: Arc<RecommendationEngine>,
    pub fetcher: Arc<MetadataFetcher>,
    pub start_time: Instant,
    pub hash: String,
}

impl ServerState {
    pub fn new(
        artifacts: Arc<TrainedArtifacts>,
        engine: Arc<RecommendationEngine>,
        fetcher: Arc<MetadataFetcher>,
    ) -> Self {
        Self {
            artifacts,
            engine,
            fetcher,
            start_time: Instant::now(),
            hash: env!("GIT_HASH").to_string(),
        }
    }
}
