mod dataset;
mod index;
mod scaler;
mod store;

pub use dataset::{ReferenceDataset, TrackRow};
pub use index::KnnIndex;
pub use scaler::StandardScaler;
pub use store::{ArtifactLoadError, ArtifactPaths, ArtifactStore, TrainedArtifacts};
