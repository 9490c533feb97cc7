//! Feature matrix extraction.
//!
//! This crate provides:
//! - [`document`]: the [`MatrixDocument`] query interface, with HTML and fixture backends
//! - [`matrix`]: version header and feature row extraction
//! - [`normalize`]: slug and documentation link helpers

pub mod document;
pub mod matrix;
pub mod normalize;

pub use document::{FixtureDocument, FixtureRow, FixtureTable, HtmlDocument, MatrixDocument};
pub use matrix::{
    ExtractOutcome, FeatureExtraction, SkippedRow, extract_dataset, extract_features,
    extract_versions,
};
pub use normalize::{is_version_label, normalize_docs_url, slugify};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use featurematrix_shared::{Dataset, ExtractConfig};

    fn load_fixture(name: &str) -> HtmlDocument {
        let path = format!("../../../fixtures/html/{name}");
        let content = std::fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("missing fixture: {path}"));
        HtmlDocument::parse(&content, &ExtractConfig::default())
    }

    fn expected() -> Dataset {
        let content = std::fs::read_to_string("../../../fixtures/json/feature_matrix.fixture.json")
            .expect("read json fixture");
        serde_json::from_str(&content).expect("parse json fixture")
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 16).unwrap()
    }

    #[test]
    fn fixture_page_versions() {
        let doc = load_fixture("featurematrix.html");
        let versions = extract_versions(&doc).unwrap();
        assert_eq!(
            versions,
            vec!["9.6", "10", "11", "12", "13", "14", "15", "16", "17"]
        );
    }

    #[test]
    fn fixture_page_matches_published_fixture() {
        let doc = load_fixture("featurematrix.html");
        let outcome = extract_dataset(&doc, &ExtractConfig::default(), today()).unwrap();
        assert_eq!(outcome.dataset, expected());
    }

    #[test]
    fn fixture_page_reports_misaligned_row() {
        let doc = load_fixture("featurematrix.html");
        let outcome = extract_dataset(&doc, &ExtractConfig::default(), today()).unwrap();
        assert_eq!(outcome.skipped_rows.len(), 1);
        assert_eq!(outcome.skipped_rows[0].name, "Logical replication of sequences");
        assert_eq!(outcome.skipped_rows[0].cells, 8);
        assert_eq!(outcome.skipped_rows[0].versions, 9);
        assert!(
            outcome
                .dataset
                .features
                .iter()
                .all(|f| f.name != "Logical replication of sequences")
        );
    }

    #[test]
    fn page_without_matrix_fails() {
        let doc = HtmlDocument::parse(
            "<html><body><h2>Quick Links</h2><p>maintenance</p></body></html>",
            &ExtractConfig::default(),
        );
        let err = extract_dataset(&doc, &ExtractConfig::default(), today()).unwrap_err();
        assert!(err.to_string().contains("matrix table not found"));
    }

    #[test]
    fn matrix_without_thead_fails() {
        let doc = HtmlDocument::parse(
            r#"<table class="matrix"><tr><th scope="row">X</th><td class="fm_yes"></td></tr></table>"#,
            &ExtractConfig::default(),
        );
        let err = extract_versions(&doc).unwrap_err();
        assert!(err.to_string().contains("header row not found"));
    }
}
