//! Matrix extraction: version header and feature rows.
//!
//! The page lists versions newest-first, both in the header and in every
//! row's data cells. Everything produced here is oldest-first.

use chrono::NaiveDate;
use featurematrix_shared::{
    DATE_FORMAT, Dataset, ExtractConfig, Feature, FeatureMatrixError, Result,
};
use tracing::{debug, info, instrument, warn};

use crate::document::MatrixDocument;
use crate::normalize::{is_version_label, normalize_docs_url, slugify};

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// A row left out because its cells do not line up with the version header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub category: String,
    pub name: String,
    /// Number of data cells found in the row.
    pub cells: usize,
    /// Number of versions in the header.
    pub versions: usize,
}

impl std::fmt::Display for SkippedRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Feature '{}' has {} cells but {} versions",
            self.name, self.cells, self.versions
        )
    }
}

/// Features of every section, plus the rows that had to be skipped.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtraction {
    pub features: Vec<Feature>,
    pub skipped_rows: Vec<SkippedRow>,
}

/// A complete extraction.
#[derive(Debug, Clone)]
pub struct ExtractOutcome {
    pub dataset: Dataset,
    pub skipped_rows: Vec<SkippedRow>,
}

// ---------------------------------------------------------------------------
// Versions
// ---------------------------------------------------------------------------

/// Read the version labels from the first matrix table's header, oldest first.
///
/// The first header cell labels the feature column and is never a version.
/// Cells whose text is not a version label (blanks, notes) are ignored.
pub fn extract_versions<D: MatrixDocument>(doc: &D) -> Result<Vec<String>> {
    let table = doc
        .matrix_table()
        .ok_or_else(|| FeatureMatrixError::extraction("matrix table not found"))?;
    let header = doc
        .header_row(table)
        .ok_or_else(|| FeatureMatrixError::extraction("matrix header row not found"))?;

    let mut versions: Vec<String> = doc
        .header_cells(header)
        .into_iter()
        .skip(1)
        .map(|cell| doc.text(cell))
        .filter(|text| is_version_label(text))
        .collect();
    versions.reverse();

    for (i, v) in versions.iter().enumerate() {
        if versions[..i].contains(v) {
            return Err(FeatureMatrixError::extraction(format!(
                "duplicate version label in matrix header: {v}"
            )));
        }
    }

    Ok(versions)
}

// ---------------------------------------------------------------------------
// Features
// ---------------------------------------------------------------------------

/// Extract every feature row under every feature section.
///
/// Rows whose cell count differs from `versions.len()` are skipped and
/// reported. Rows with no supported version are dropped silently.
pub fn extract_features<D: MatrixDocument>(
    doc: &D,
    versions: &[String],
    config: &ExtractConfig,
) -> FeatureExtraction {
    let newest_first: Vec<&String> = versions.iter().rev().collect();
    let mut out = FeatureExtraction::default();

    for heading in doc.section_headings() {
        let category = doc.text(heading);
        if config.skip_headings.iter().any(|h| *h == category) {
            continue;
        }

        let Some(table) = doc.table_after(heading) else {
            debug!(%category, "no matrix table after heading");
            continue;
        };
        let Some(rows) = doc.body_rows(table) else {
            debug!(%category, "matrix table has no body");
            continue;
        };

        for row in rows {
            let Some(th) = doc.row_header(row) else {
                continue;
            };
            let name = doc.text(th);
            if name.is_empty() {
                continue;
            }

            let docs_url = doc.link_href(th).map(|href| {
                normalize_docs_url(&href, &config.site_origin, &config.detail_base_url)
            });

            let cells = doc.data_cells(row);
            if cells.len() != versions.len() {
                let skipped = SkippedRow {
                    category: category.clone(),
                    name,
                    cells: cells.len(),
                    versions: versions.len(),
                };
                warn!(category = %skipped.category, "{skipped}");
                out.skipped_rows.push(skipped);
                continue;
            }

            let mut present_in: Vec<String> = cells
                .into_iter()
                .enumerate()
                .filter(|(_, cell)| doc.is_supported(*cell))
                .map(|(i, _)| newest_first[i].clone())
                .collect();
            present_in.reverse();

            let Some(introduced_in) = present_in.first().cloned() else {
                debug!(%category, %name, "feature not supported in any version, dropping");
                continue;
            };
            let deprecated_in = deprecated_after(&present_in, versions);

            out.features.push(Feature {
                id: slugify(&name),
                name,
                category: category.clone(),
                introduced_in: Some(introduced_in),
                deprecated_in,
                present_in,
                docs_url,
            });
        }
    }

    out
}

/// The version right after the last supported one, unless support reaches the newest version.
///
/// Absence from later columns is read as removal; the page cannot tell us
/// otherwise.
fn deprecated_after(present_in: &[String], versions: &[String]) -> Option<String> {
    let last = present_in.last()?;
    if versions.last() == Some(last) {
        return None;
    }
    let idx = versions.iter().position(|v| v == last)?;
    versions.get(idx + 1).cloned()
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// Extract the full dataset, stamped with `today`.
#[instrument(skip_all)]
pub fn extract_dataset<D: MatrixDocument>(
    doc: &D,
    config: &ExtractConfig,
    today: NaiveDate,
) -> Result<ExtractOutcome> {
    let versions = extract_versions(doc)?;
    if versions.is_empty() {
        return Err(FeatureMatrixError::extraction(
            "no versions found in matrix header",
        ));
    }
    info!(versions = %versions.join(", "), "found versions");

    let FeatureExtraction {
        features,
        skipped_rows,
    } = extract_features(doc, &versions, config);
    info!(
        features = features.len(),
        skipped = skipped_rows.len(),
        "extracted features"
    );

    Ok(ExtractOutcome {
        dataset: Dataset {
            last_updated: today.format(DATE_FORMAT).to_string(),
            versions,
            features,
        },
        skipped_rows,
    })
}
