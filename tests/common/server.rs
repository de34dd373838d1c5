use super::fixtures::write_artifact_fixtures;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;
use trackmatch::artifacts::{ArtifactPaths, ArtifactStore};
use trackmatch::catalog::{
    ApiAlbum, ApiArtist, ApiImage, ApiTrack, CatalogApi, CatalogApiError, MetadataFetcher,
};
use trackmatch::recommender::RecommendationEngine;
use trackmatch::server::{build_router, ServerState};

/// Stub catalog API: deterministic metadata for any id, with an optional
/// set of ids whose lookups fail.
pub struct StubCatalog {
    failing: HashSet<String>,
}

impl StubCatalog {
    pub fn new(failing: &[&str]) -> Self {
        Self {
            failing: failing.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[async_trait]
impl CatalogApi for StubCatalog {
    async fn get_track(&self, id: &str) -> Result<ApiTrack, CatalogApiError> {
        if self.failing.contains(id) {
            return Err(CatalogApiError::Status {
                id: id.to_string(),
                status: 404,
            });
        }
        Ok(ApiTrack {
            id: id.to_string(),
            name: format!("Title {id}"),
            artists: vec![ApiArtist {
                name: "Stub Artist".to_string(),
            }],
            album: ApiAlbum {
                name: "Stub Album".to_string(),
                images: vec![
                    ApiImage {
                        url: format!("https://img.test/{id}/640"),
                        width: Some(640),
                        height: Some(640),
                    },
                    ApiImage {
                        url: format!("https://img.test/{id}/300"),
                        width: Some(300),
                        height: Some(300),
                    },
                    ApiImage {
                        url: format!("https://img.test/{id}/64"),
                        width: Some(64),
                        height: Some(64),
                    },
                ],
            },
            external_urls: [(
                "spotify".to_string(),
                format!("https://open.spotify.com/track/{id}"),
            )]
            .into_iter()
            .collect(),
        })
    }
}

pub struct TestServer {
    pub base_url: String,
    _artifacts_dir: TempDir,
}

impl TestServer {
    pub async fn spawn() -> Self {
        Self::spawn_with_failing_tracks(&[]).await
    }

    /// Spawn a server whose catalog stub fails for the given track ids.
    pub async fn spawn_with_failing_tracks(failing: &[&str]) -> Self {
        let artifacts_dir = write_artifact_fixtures();
        let store = ArtifactStore::new(ArtifactPaths::from_dir(artifacts_dir.path()));
        let artifacts = store.load().unwrap();

        let engine = Arc::new(RecommendationEngine::new(artifacts.clone(), 5));
        let catalog: Arc<dyn CatalogApi> = Arc::new(StubCatalog::new(failing));
        let fetcher = Arc::new(MetadataFetcher::new(catalog, 5));
        let state = ServerState::new(artifacts, engine, fetcher);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            _artifacts_dir: artifacts_dir,
        }
    }
}
