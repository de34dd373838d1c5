//! The recommendation engine.
//!
//! Validates slider parameters, projects them into the trained feature
//! space, queries the nearest-neighbor index with over-fetch headroom, then
//! filters, ranks and truncates the candidates.

use crate::artifacts::{TrackRow, TrainedArtifacts};
use crate::recommender::params::{CategoricalFilters, FeatureParams, RecommendError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Ceiling on returned results, matching what any shell can sensibly render.
pub const MAX_RESULTS: usize = 20;

/// How many neighbors to fetch per requested result, to compensate for rows
/// removed by the post-hoc filters. Tunable, never derived from data.
pub const DEFAULT_OVERFETCH_FACTOR: usize = 5;

const MIN_OVERFETCH_FACTOR: usize = 2;

/// One recommended track, ready for identifier-based enrichment.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub track_id: String,
    pub title: String,
    pub artist: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<String>,
    pub distance: f64,
}

pub struct RecommendationEngine {
    artifacts: Arc<TrainedArtifacts>,
    overfetch_factor: usize,
}

impl RecommendationEngine {
    pub fn new(artifacts: Arc<TrainedArtifacts>, overfetch_factor: usize) -> Self {
        Self {
            artifacts,
            overfetch_factor: overfetch_factor.max(MIN_OVERFETCH_FACTOR),
        }
    }

    /// Generate up to `min(top_n, MAX_RESULTS)` recommendations, ascending
    /// by distance in the trained feature space.
    pub fn recommend(
        &self,
        features: &FeatureParams,
        filters: &CategoricalFilters,
        top_n: usize,
    ) -> Result<Vec<Recommendation>, RecommendError> {
        // Results are capped anyway; clamping up front keeps the over-fetch
        // arithmetic in range for any deserializable top_n.
        let top_n = top_n.min(MAX_RESULTS);
        if self.artifacts.dataset.is_empty() {
            return Err(RecommendError::DatasetUnavailable);
        }
        features.validate()?;

        let query = self.build_query(features, filters)?;

        let index = &self.artifacts.index;
        let k = (self.overfetch_factor * top_n).min(index.len());
        let neighbors = index.kneighbors(&query, k);
        debug!(
            "Fetched {} neighbors for top_n={} (overfetch {}x)",
            neighbors.len(),
            top_n,
            self.overfetch_factor
        );

        let mut candidates: Vec<(&TrackRow, f64)> = neighbors
            .into_iter()
            .filter_map(|(i, distance)| self.artifacts.dataset.row(i).map(|row| (row, distance)))
            .collect();

        // Each filter strictly narrows the candidate set, in this order.
        if let Some(popular) = filters.is_popular {
            candidates.retain(|(row, _)| row.indicator("is_popular") == Some(popular));
        }
        if let Some(explicit) = filters.is_explicit {
            if self.artifacts.dataset.has_column("is_explicit") {
                candidates.retain(|(row, _)| row.indicator("is_explicit") == Some(explicit));
            }
        }
        if let Some(decade) = &filters.decade {
            let column = decade_column(decade);
            candidates.retain(|(row, _)| row.indicator(&column) == Some(true));
        }
        candidates.retain(|(row, _)| row.has_display_fields() && row.resolved_id().is_some());

        // Stable sort keeps tie order deterministic across identical calls.
        candidates.sort_by(|a, b| a.1.total_cmp(&b.1));
        candidates.truncate(top_n);

        Ok(candidates
            .into_iter()
            .filter_map(|(row, distance)| {
                let track_id = row.resolved_id()?.to_string();
                Some(Recommendation {
                    track_id,
                    title: row.title.clone().unwrap_or_default(),
                    artist: row.artist.clone().unwrap_or_default(),
                    genres: row.genres.clone(),
                    distance,
                })
            })
            .collect())
    }

    /// Project the raw parameters into the trained feature space and lay
    /// them out exactly per the trained feature order.
    fn build_query(
        &self,
        features: &FeatureParams,
        filters: &CategoricalFilters,
    ) -> Result<Vec<f64>, RecommendError> {
        let scaler = &self.artifacts.scaler;
        let feature_order = &self.artifacts.feature_order;

        // Raw single-row frame, ordered per the dataset's numeric columns.
        let raw: Vec<f64> = scaler
            .columns
            .iter()
            .map(|column| {
                features.value(column).ok_or_else(|| {
                    RecommendError::FeatureSchema(format!(
                        "scaler column \"{column}\" is not a known input parameter"
                    ))
                })
            })
            .collect::<Result<_, _>>()?;
        let scaled = scaler.transform(&raw);

        let scaled_by_name: BTreeMap<&str, f64> = scaler
            .columns
            .iter()
            .map(String::as_str)
            .zip(scaled)
            .collect();

        for column in &scaler.columns {
            if !feature_order.contains(column) {
                return Err(RecommendError::FeatureSchema(format!(
                    "scaled column \"{column}\" is missing from the trained feature order"
                )));
            }
        }
        if let Some(decade) = &filters.decade {
            if !feature_order.contains(&decade_column(decade)) {
                return Err(RecommendError::UnknownDecade(decade.clone()));
            }
        }

        feature_order
            .iter()
            .map(|column| {
                if let Some(value) = scaled_by_name.get(column.as_str()) {
                    Ok(*value)
                } else if column == "is_popular" {
                    Ok(flag(filters.is_popular))
                } else if column == "is_explicit" {
                    Ok(flag(filters.is_explicit))
                } else if let Some(decade) = column.strip_prefix("decade_") {
                    Ok(if filters.decade.as_deref() == Some(decade) {
                        1.0
                    } else {
                        0.0
                    })
                } else {
                    Err(RecommendError::FeatureSchema(format!(
                        "trained column \"{column}\" has no known source"
                    )))
                }
            })
            .collect()
    }
}

fn decade_column(decade: &str) -> String {
    format!("decade_{decade}")
}

fn flag(value: Option<bool>) -> f64 {
    match value {
        Some(true) => 1.0,
        _ => 0.0,
    }
}
