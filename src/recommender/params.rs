//! Recommendation inputs and their validation.
//!
//! Sliders are raw 0-100 values matched against a scaler fitted on the same
//! 0-100 scale. Values are validated, never clamped.

use serde::Deserialize;
use thiserror::Error;

/// Valid range for every numeric feature parameter.
pub const FEATURE_DOMAIN: (f64, f64) = (0.0, 100.0);

#[derive(Debug, Error)]
pub enum RecommendError {
    /// User input outside its declared domain. Recoverable, surfaced to the
    /// shell for re-entry.
    #[error("{name} must be between {min} and {max}, got {value}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// The selected decade has no indicator column in the trained features.
    #[error("unknown decade \"{0}\"")]
    UnknownDecade(String),

    /// The trained feature order and the engine inputs disagree. A
    /// configuration defect, not a user error.
    #[error("feature schema mismatch: {0}")]
    FeatureSchema(String),

    /// The reference dataset never loaded or is empty.
    #[error("reference dataset is unavailable, cannot recommend")]
    DatasetUnavailable,
}

/// Numeric audio-feature parameters, one per slider.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureParams {
    pub danceability: f64,
    pub energy: f64,
    pub speechiness: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub valence: f64,
}

impl FeatureParams {
    /// Parameter values paired with their names, in declaration order.
    pub fn named(&self) -> [(&'static str, f64); 6] {
        [
            ("danceability", self.danceability),
            ("energy", self.energy),
            ("speechiness", self.speechiness),
            ("acousticness", self.acousticness),
            ("instrumentalness", self.instrumentalness),
            ("valence", self.valence),
        ]
    }

    /// Look up a parameter by its dataset column name.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.named()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// Check every parameter against [`FEATURE_DOMAIN`]. Fails on the first
    /// violation, naming the offending parameter and its value.
    pub fn validate(&self) -> Result<(), RecommendError> {
        let (min, max) = FEATURE_DOMAIN;
        for (name, value) in self.named() {
            if !value.is_finite() || value < min || value > max {
                return Err(RecommendError::InvalidParameter {
                    name,
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}

/// Optional categorical filters applied after the neighbor query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoricalFilters {
    #[serde(default)]
    pub is_popular: Option<bool>,
    #[serde(default)]
    pub is_explicit: Option<bool>,
    #[serde(default)]
    pub decade: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_params() -> FeatureParams {
        FeatureParams {
            danceability: 70.0,
            energy: 60.0,
            speechiness: 5.0,
            acousticness: 10.0,
            instrumentalness: 0.0,
            valence: 80.0,
        }
    }

    #[test]
    fn test_valid_params_pass() {
        assert!(valid_params().validate().is_ok());
    }

    #[test]
    fn test_boundary_values_pass() {
        let mut params = valid_params();
        params.danceability = 0.0;
        params.energy = 100.0;
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_out_of_domain_names_offending_parameter() {
        let mut params = valid_params();
        params.danceability = 150.0;

        let err = params.validate().unwrap_err();
        match err {
            RecommendError::InvalidParameter { name, value, .. } => {
                assert_eq!(name, "danceability");
                assert_eq!(value, 150.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(params
            .validate()
            .unwrap_err()
            .to_string()
            .contains("danceability"));
    }

    #[test]
    fn test_negative_value_rejected() {
        let mut params = valid_params();
        params.valence = -0.1;
        assert!(matches!(
            params.validate(),
            Err(RecommendError::InvalidParameter { name: "valence", .. })
        ));
    }

    #[test]
    fn test_non_finite_value_rejected() {
        let mut params = valid_params();
        params.energy = f64::NAN;
        assert!(matches!(
            params.validate(),
            Err(RecommendError::InvalidParameter { name: "energy", .. })
        ));
    }

    #[test]
    fn test_value_lookup_by_column_name() {
        let params = valid_params();
        assert_eq!(params.value("acousticness"), Some(10.0));
        assert_eq!(params.value("tempo"), None);
    }
}
