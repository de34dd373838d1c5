//! Loading and caching of the trained artifacts.
//!
//! Four artifacts make up a deployment: the nearest-neighbor index, the
//! fitted scaler, the ordered feature list the index was trained on, and the
//! reference dataset. All four are immutable once loaded and shared through
//! an `Arc` for the lifetime of the process.

use super::{KnnIndex, ReferenceDataset, StandardScaler, TrackRow};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ArtifactLoadError {
    #[error("failed to read {name} artifact at {path:?}: {source}")]
    Read {
        name: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {name} artifact at {path:?}: {source}")]
    Parse {
        name: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("inconsistent artifacts: {0}")]
    Inconsistent(String),
}

/// File locations of the four artifacts, derived from a single directory.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub features: PathBuf,
    pub dataset: PathBuf,
}

impl ArtifactPaths {
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            model: dir.join("model.json"),
            scaler: dir.join("scaler.json"),
            features: dir.join("features.json"),
            dataset: dir.join("dataset.json"),
        }
    }
}

/// The immutable artifacts the engine serves from.
#[derive(Debug)]
pub struct TrainedArtifacts {
    pub index: KnnIndex,
    pub scaler: StandardScaler,
    pub dataset: ReferenceDataset,
    pub feature_order: Vec<String>,
}

impl TrainedArtifacts {
    /// Load all artifacts from disk.
    ///
    /// The index, scaler and feature list are required. The reference
    /// dataset is optional: a missing file degrades to an empty dataset
    /// (the engine then refuses to serve, but the process can come up and
    /// report the condition).
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactLoadError> {
        info!("Loading model from {:?}...", paths.model);
        let index: KnnIndex = read_json("model", &paths.model)?;
        index
            .check()
            .map_err(|e| ArtifactLoadError::Inconsistent(e.to_string()))?;

        info!("Loading scaler from {:?}...", paths.scaler);
        let scaler: StandardScaler = read_json("scaler", &paths.scaler)?;
        scaler
            .check()
            .map_err(|e| ArtifactLoadError::Inconsistent(e.to_string()))?;

        info!("Loading feature order from {:?}...", paths.features);
        let feature_order: Vec<String> = read_json("features", &paths.features)?;

        info!("Loading dataset from {:?}...", paths.dataset);
        let dataset = match std::fs::read_to_string(&paths.dataset) {
            Ok(content) => {
                let rows: Vec<TrackRow> =
                    serde_json::from_str(&content).map_err(|source| ArtifactLoadError::Parse {
                        name: "dataset",
                        path: paths.dataset.clone(),
                        source,
                    })?;
                ReferenceDataset::new(rows)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "Dataset artifact not found at {:?}, continuing with an empty dataset",
                    paths.dataset
                );
                ReferenceDataset::empty()
            }
            Err(source) => {
                return Err(ArtifactLoadError::Read {
                    name: "dataset",
                    path: paths.dataset.clone(),
                    source,
                })
            }
        };

        let artifacts = Self {
            index,
            scaler,
            dataset,
            feature_order,
        };
        artifacts.check_consistency()?;

        info!(
            "Artifacts loaded: {} reference tracks, {} trained features",
            artifacts.dataset.len(),
            artifacts.feature_order.len()
        );
        Ok(artifacts)
    }

    fn check_consistency(&self) -> Result<(), ArtifactLoadError> {
        if self.index.dim() != self.feature_order.len() {
            return Err(ArtifactLoadError::Inconsistent(format!(
                "index dimension is {} but the feature order lists {} columns",
                self.index.dim(),
                self.feature_order.len()
            )));
        }
        if !self.dataset.is_empty() && self.index.len() != self.dataset.len() {
            return Err(ArtifactLoadError::Inconsistent(format!(
                "index holds {} vectors but the dataset has {} rows",
                self.index.len(),
                self.dataset.len()
            )));
        }
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(
    name: &'static str,
    path: &Path,
) -> Result<T, ArtifactLoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| ArtifactLoadError::Read {
        name,
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ArtifactLoadError::Parse {
        name,
        path: path.to_path_buf(),
        source,
    })
}

/// Load-once holder for the trained artifacts.
///
/// Constructed explicitly at process start and passed by handle to whoever
/// needs the artifacts. The first `load` call pays the disk cost; later
/// calls (from any thread) get the cached value. A failed load is not
/// cached, so a later call may retry.
pub struct ArtifactStore {
    paths: ArtifactPaths,
    cell: OnceLock<Arc<TrainedArtifacts>>,
}

impl ArtifactStore {
    pub fn new(paths: ArtifactPaths) -> Self {
        Self {
            paths,
            cell: OnceLock::new(),
        }
    }

    pub fn load(&self) -> Result<Arc<TrainedArtifacts>, ArtifactLoadError> {
        if let Some(artifacts) = self.cell.get() {
            return Ok(artifacts.clone());
        }
        let loaded = Arc::new(TrainedArtifacts::load(&self.paths)?);
        // A concurrent load may have won the race; both loaded the same
        // immutable files, keep whichever landed first.
        Ok(self.cell.get_or_init(|| loaded).clone())
    }
}
