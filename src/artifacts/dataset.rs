//! Reference dataset: one row per track with pre-computed feature columns
//! and display metadata, aligned row-for-row with the nearest-neighbor index.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One record of the reference dataset.
///
/// Numeric feature and indicator columns (popularity flag, explicit flag,
/// one-hot decade indicators) live in the flattened `columns` map; identity
/// and display columns are typed fields. The track identifier is either the
/// `track_id` column or, in older dataset exports, the `id` column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<String>,
    #[serde(flatten)]
    pub columns: BTreeMap<String, f64>,
}

impl TrackRow {
    /// Resolve the track identifier, falling back to the alternate `id`
    /// column when `track_id` is absent or empty.
    pub fn resolved_id(&self) -> Option<&str> {
        self.track_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.id.as_deref().filter(|s| !s.is_empty()))
    }

    /// Read an indicator column as a boolean. Returns `None` if the column
    /// is absent from this row.
    pub fn indicator(&self, name: &str) -> Option<bool> {
        self.columns.get(name).map(|v| *v >= 0.5)
    }

    /// Whether the row has the display fields every returned result needs.
    pub fn has_display_fields(&self) -> bool {
        let filled = |s: &Option<String>| s.as_deref().is_some_and(|v| !v.trim().is_empty());
        filled(&self.artist) && filled(&self.title)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceDataset {
    rows: Vec<TrackRow>,
    columns: BTreeSet<String>,
}

impl ReferenceDataset {
    pub fn new(rows: Vec<TrackRow>) -> Self {
        let columns = rows
            .iter()
            .flat_map(|r| r.columns.keys().cloned())
            .collect();
        Self { rows, columns }
    }

    /// The degraded dataset used when the artifact file is absent.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&TrackRow> {
        self.rows.get(index)
    }

    /// Whether any row carries the named feature/indicator column.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }
}
