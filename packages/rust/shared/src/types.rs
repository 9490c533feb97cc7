//! Core domain types for the published feature matrix artifact.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Format of [`Dataset::last_updated`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// The `feature_matrix.json` artifact.
///
/// Built fresh on every run and written out wholesale; never patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Date of the scrape (`YYYY-MM-DD`).
    pub last_updated: String,
    /// Version labels, oldest first.
    pub versions: Vec<String>,
    /// Features in document order (category, then row).
    pub features: Vec<Feature>,
}

impl Dataset {
    /// The newest version in the matrix, if any.
    pub fn newest_version(&self) -> Option<&str> {
        self.versions.last().map(String::as_str)
    }

    /// Number of distinct categories across all features.
    pub fn category_count(&self) -> usize {
        self.features
            .iter()
            .map(|f| f.category.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }
}

// ---------------------------------------------------------------------------
// Feature
// ---------------------------------------------------------------------------

/// A single row of the matrix: one feature and the versions supporting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Slug derived from `name`. Not guaranteed unique.
    pub id: String,
    /// Human-readable feature label.
    pub name: String,
    /// Section heading the feature was listed under.
    pub category: String,
    /// Oldest version with support.
    pub introduced_in: Option<String>,
    /// Version right after the last supported one, if support ended before the newest version.
    pub deprecated_in: Option<String>,
    /// Supported versions, oldest first.
    pub present_in: Vec<String>,
    /// Absolute documentation URL.
    pub docs_url: Option<String>,
}
