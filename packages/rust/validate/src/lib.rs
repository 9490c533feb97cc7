//! Publication guard for scraped feature matrix data.
//!
//! Runs a fixed sequence of checks over a freshly extracted dataset (as JSON)
//! and, when available, the previously published artifact:
//!
//! 1. schema conformance: blocking
//! 2. non-empty fields: blocking
//! 3. feature count drift
//! 4. feature name continuity
//! 5. version consistency
//!
//! Checks 3–5 only run against a previous artifact and all of them run even
//! if one fails. Problems are reported as messages in a [`ValidationReport`],
//! never as `Err`; the caller decides whether they block publication.

mod drift;
mod structure;

use featurematrix_shared::ValidationConfig;
use serde_json::Value;
use tracing::{debug, instrument};

pub use drift::{validate_feature_continuity, validate_feature_count, validate_version_consistency};
pub use structure::{artifact_schema, validate_non_empty, validate_schema};

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub passed: bool,
    pub errors: Vec<String>,
}

impl CheckOutcome {
    pub fn pass() -> Self {
        Self {
            passed: true,
            errors: Vec::new(),
        }
    }

    pub fn fail(errors: Vec<String>) -> Self {
        Self {
            passed: false,
            errors,
        }
    }

    /// Passed iff `errors` is empty.
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            passed: errors.is_empty(),
            errors,
        }
    }
}

/// Accumulated result of [`validate_feature_data`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn absorb(&mut self, check: &str, outcome: CheckOutcome) -> bool {
        debug!(check, passed = outcome.passed, errors = outcome.errors.len(), "check finished");
        self.errors.extend(outcome.errors);
        outcome.passed
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Run every check over `new`, comparing against `old` when given.
#[instrument(skip_all, fields(has_previous = old.is_some()))]
pub fn validate_feature_data(
    new: &Value,
    old: Option<&Value>,
    config: &ValidationConfig,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    if !report.absorb("schema", validate_schema(new)) {
        return report;
    }
    if !report.absorb("non_empty", validate_non_empty(new)) {
        return report;
    }

    if let Some(old) = old.filter(|o| !is_falsy(Some(*o))) {
        report.absorb(
            "feature_count",
            validate_feature_count(new, old, config.count_tolerance),
        );
        report.absorb(
            "feature_continuity",
            validate_feature_continuity(new, old, config.min_overlap),
        );
        report.absorb(
            "version_consistency",
            validate_version_consistency(new, old, config.significant_major),
        );
    }

    report
}

/// Missing, null, `false`, zero, or an empty string, array, or object.
pub(crate) fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(Value::Object(o)) => o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dataset(names: &[&str], versions: &[&str]) -> Value {
        let features: Vec<Value> = names
            .iter()
            .map(|n| {
                json!({
                    "id": n.to_lowercase(),
                    "name": n,
                    "category": "Backend",
                    "introduced_in": versions[0],
                    "deprecated_in": null,
                    "present_in": versions,
                    "docs_url": null
                })
            })
            .collect();
        json!({ "last_updated": "2025-10-16", "versions": versions, "features": features })
    }

    fn config() -> ValidationConfig {
        ValidationConfig::default()
    }

    const TEN: [&str; 10] = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"];

    #[test]
    fn no_baseline_never_runs_comparisons() {
        let new = dataset(&["A"], &["17"]);
        let report = validate_feature_data(&new, None, &config());
        assert!(report.is_valid());
    }

    #[test]
    fn empty_baseline_is_treated_as_absent() {
        let new = dataset(&["A"], &["17"]);
        let report = validate_feature_data(&new, Some(&json!({})), &config());
        assert!(report.is_valid());
    }

    #[test]
    fn identical_data_is_valid() {
        let data = dataset(&TEN, &["12", "17"]);
        assert!(validate_feature_data(&data, Some(&data), &config()).is_valid());
    }

    #[test]
    fn schema_failure_short_circuits() {
        let new = json!({ "versions": ["17"], "features": [] });
        let old = dataset(&TEN, &["17"]);
        let report = validate_feature_data(&new, Some(&old), &config());
        assert!(!report.is_valid());
        assert!(report.errors.iter().all(|e| e.starts_with("Schema validation error")));
    }

    #[test]
    fn non_empty_failure_short_circuits() {
        let new = dataset(&[], &["17"]);
        let old = dataset(&TEN, &["17"]);
        let report = validate_feature_data(&new, Some(&old), &config());
        assert_eq!(report.errors, vec!["Features array is empty"]);
    }

    #[test]
    fn comparison_errors_accumulate() {
        // 2 of 10 features gone (count -20%, overlap 80%) and version 12 dropped.
        let old = dataset(&TEN, &["12", "17"]);
        let new = dataset(&TEN[2..], &["17"]);
        let report = validate_feature_data(&new, Some(&old), &config());

        assert!(!report.is_valid());
        assert_eq!(report.errors.len(), 4);
        assert!(report.errors[0].starts_with("Feature count changed dramatically: 10 -> 8"));
        assert!(report.errors[1].starts_with("Too many features disappeared: 2 out of 10"));
        assert!(report.errors[2].starts_with("Sample missing features:"));
        assert_eq!(report.errors[3], "Version(s) disappeared from matrix: 12");
    }

    #[test]
    fn insignificant_version_loss_is_valid() {
        let old = dataset(&TEN, &["9.6", "12", "17"]);
        let new = dataset(&TEN, &["12", "17"]);
        assert!(validate_feature_data(&new, Some(&old), &config()).is_valid());
    }

    #[test]
    fn thresholds_come_from_config() {
        let old = dataset(&TEN, &["17"]);
        let new = dataset(&TEN[..8], &["17"]);
        let lenient = ValidationConfig {
            count_tolerance: 0.25,
            min_overlap: 0.75,
            significant_major: 10,
        };
        assert!(validate_feature_data(&new, Some(&old), &lenient).is_valid());
        assert!(!validate_feature_data(&new, Some(&old), &config()).is_valid());
    }

    #[test]
    fn published_fixture_is_valid() {
        let content = std::fs::read_to_string("../../../fixtures/json/feature_matrix.fixture.json")
            .expect("read fixture");
        let data: Value = serde_json::from_str(&content).expect("parse fixture");
        assert!(validate_feature_data(&data, Some(&data), &config()).is_valid());
    }

    #[test]
    fn falsy_values() {
        assert!(is_falsy(None));
        assert!(is_falsy(Some(&json!(""))));
        assert!(is_falsy(Some(&json!([]))));
        assert!(is_falsy(Some(&json!(null))));
        assert!(!is_falsy(Some(&json!("x"))));
        assert!(!is_falsy(Some(&json!(["17"]))));
    }
}
