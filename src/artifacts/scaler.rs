//! Pre-fitted standard scaler mapping raw feature values into the trained
//! feature space. Fitted by the training side, deterministic at serving time.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Numeric column names, in the order the dataset declares them.
    pub columns: Vec<String>,
    mean: Vec<f64>,
    std: Vec<f64>,
}

impl StandardScaler {
    pub fn new(columns: Vec<String>, mean: Vec<f64>, std: Vec<f64>) -> anyhow::Result<Self> {
        if columns.len() != mean.len() || columns.len() != std.len() {
            anyhow::bail!(
                "scaler has {} columns but {} means and {} stds",
                columns.len(),
                mean.len(),
                std.len()
            );
        }
        if std.iter().any(|s| !s.is_finite() || *s == 0.0) {
            anyhow::bail!("scaler std values must be finite and non-zero");
        }
        Ok(Self { columns, mean, std })
    }

    /// Validate an already-deserialized scaler. Used after loading the
    /// artifact from disk.
    pub fn check(&self) -> anyhow::Result<()> {
        Self::new(self.columns.clone(), self.mean.clone(), self.std.clone()).map(|_| ())
    }

    /// Transform a raw row (ordered per `columns`) into the trained space.
    pub fn transform(&self, raw: &[f64]) -> Vec<f64> {
        raw.iter()
            .zip(self.mean.iter().zip(self.std.iter()))
            .map(|(x, (m, s))| (x - m) / s)
            .collect()
    }
}
