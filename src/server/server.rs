//! HTTP surface for the recommendation engine and metadata fetcher.
//!
//! Any shell that can collect slider values and render cards can sit in
//! front of these two routes.

use super::state::ServerState;
use crate::catalog::TrackToEnrich;
use crate::recommender::{CategoricalFilters, FeatureParams, RecommendError};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

const DEFAULT_TOP_N: usize = 10;

pub enum ApiError {
    /// User input the shell can correct and resubmit.
    BadRequest(String),
    /// Configuration or deployment defect; details go to the log only.
    Internal,
}

impl From<RecommendError> for ApiError {
    fn from(e: RecommendError) -> Self {
        match e {
            RecommendError::InvalidParameter { .. } | RecommendError::UnknownDecade(_) => {
                ApiError::BadRequest(e.to_string())
            }
            RecommendError::FeatureSchema(_) | RecommendError::DatasetUnavailable => {
                error!("Recommendation failed: {}", e);
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": message })),
            )
                .into_response(),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal error" })),
            )
                .into_response(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    #[serde(flatten)]
    features: FeatureParams,
    #[serde(flatten)]
    filters: CategoricalFilters,
    #[serde(default = "default_top_n")]
    top_n: usize,
    #[serde(default = "default_enrich")]
    enrich: bool,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_enrich() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    tracks: Vec<crate::recommender::Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    enriched: Option<Vec<crate::catalog::EnrichedTrack>>,
}

async fn health(State(state): State<ServerState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": state.hash,
        "uptime_sec": state.start_time.elapsed().as_secs(),
        "dataset_size": state.artifacts.dataset.len(),
    }))
}

async fn recommendations(
    State(state): State<ServerState>,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let tracks = state
        .engine
        .recommend(&request.features, &request.filters, request.top_n)?;

    let enriched = if request.enrich && !tracks.is_empty() {
        let to_enrich: Vec<TrackToEnrich> = tracks
            .iter()
            .map(|t| TrackToEnrich {
                id: t.track_id.clone(),
                genres: t.genres.clone(),
            })
            .collect();
        Some(state.fetcher.enrich(&to_enrich).await)
    } else {
        None
    };

    Ok(Json(RecommendationResponse { tracks, enriched }))
}

pub fn build_router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/recommendations", post(recommendations))
        .with_state(state)
}

pub async fn run_server(state: ServerState, port: u16) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Ready to serve at port {}!", port);
    axum::serve(listener, app).await?;
    Ok(())
}
