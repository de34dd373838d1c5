//! Exact nearest-neighbor index over pre-computed feature vectors.
//!
//! The index is produced by the training side and loaded as an opaque
//! artifact. Queries are a linear scan with Euclidean distance, which is
//! plenty for catalog-sized datasets (tens of thousands of rows).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnnIndex {
    dim: usize,
    vectors: Vec<Vec<f64>>,
}

impl KnnIndex {
    /// Build an index from pre-scaled vectors. All vectors must share the
    /// same dimension and contain only finite values.
    pub fn new(dim: usize, vectors: Vec<Vec<f64>>) -> anyhow::Result<Self> {
        for (i, v) in vectors.iter().enumerate() {
            if v.len() != dim {
                anyhow::bail!(
                    "vector {} has dimension {}, index expects {}",
                    i,
                    v.len(),
                    dim
                );
            }
            if v.iter().any(|x| !x.is_finite()) {
                anyhow::bail!("vector {} contains a non-finite value", i);
            }
        }
        Ok(Self { dim, vectors })
    }

    /// Validate an already-deserialized index. Used after loading the
    /// artifact from disk.
    pub fn check(&self) -> anyhow::Result<()> {
        Self::new(self.dim, self.vectors.clone()).map(|_| ())
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Find the `k` stored vectors closest to `query`, ascending by
    /// Euclidean distance. Ties keep insertion order so repeated queries
    /// return identical results.
    ///
    /// The caller is responsible for passing a query of the right
    /// dimension; this is enforced upstream against the trained feature
    /// order.
    pub fn kneighbors(&self, query: &[f64], k: usize) -> Vec<(usize, f64)> {
        let mut scored: Vec<(usize, f64)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, euclidean(query, v)))
            .collect();
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(k);
        scored
    }
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
