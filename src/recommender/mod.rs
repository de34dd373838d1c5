mod engine;
mod params;

pub use engine::{
    Recommendation, RecommendationEngine, DEFAULT_OVERFETCH_FACTOR, MAX_RESULTS,
};
pub use params::{CategoricalFilters, FeatureParams, RecommendError, FEATURE_DOMAIN};
