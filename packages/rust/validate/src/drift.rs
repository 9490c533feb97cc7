//! Comparison checks against the previously published artifact.
//!
//! Each check passes trivially when the previous artifact has nothing to
//! compare on its axis.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::CheckOutcome;

/// How many missing feature names to list in a continuity error.
const SAMPLE_MISSING: usize = 5;

fn features(data: &Value) -> &[Value] {
    data.get("features")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn feature_names(data: &Value) -> BTreeSet<&str> {
    features(data)
        .iter()
        .filter_map(|f| f.get("name").and_then(Value::as_str))
        .collect()
}

fn version_set(data: &Value) -> BTreeSet<&str> {
    data.get("versions")
        .and_then(Value::as_array)
        .map(|vs| vs.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

/// Leading integer component of a version label (`"9.6"` → 9).
fn leading_major(version: &str) -> Option<u32> {
    version.split('.').next()?.parse().ok()
}

/// The feature count must stay within `tolerance` of the previous count.
pub fn validate_feature_count(new: &Value, old: &Value, tolerance: f64) -> CheckOutcome {
    let old_count = features(old).len();
    let new_count = features(new).len();
    if old_count == 0 {
        return CheckOutcome::pass();
    }

    let min_allowed = old_count as f64 * (1.0 - tolerance);
    let max_allowed = old_count as f64 * (1.0 + tolerance);
    let n = new_count as f64;

    if n < min_allowed || n > max_allowed {
        return CheckOutcome::fail(vec![format!(
            "Feature count changed dramatically: {old_count} -> {new_count} \
             (allowed range: {}-{})",
            min_allowed as i64, max_allowed as i64
        )]);
    }
    CheckOutcome::pass()
}

/// At least `min_overlap` of the previous feature names must still be present.
///
/// Names are compared exactly, so a renamed feature counts as removed.
pub fn validate_feature_continuity(new: &Value, old: &Value, min_overlap: f64) -> CheckOutcome {
    let old_names = feature_names(old);
    if old_names.is_empty() {
        return CheckOutcome::pass();
    }
    let new_names = feature_names(new);

    let overlap = old_names.intersection(&new_names).count();
    let ratio = overlap as f64 / old_names.len() as f64;
    if ratio >= min_overlap {
        return CheckOutcome::pass();
    }

    let missing: Vec<&str> = old_names.difference(&new_names).copied().collect();
    let sample: Vec<&str> = missing.iter().take(SAMPLE_MISSING).copied().collect();

    CheckOutcome::fail(vec![
        format!(
            "Too many features disappeared: {} out of {} \
             ({:.1}% overlap, minimum required: {:.0}%)",
            missing.len(),
            old_names.len(),
            ratio * 100.0,
            min_overlap * 100.0
        ),
        format!("Sample missing features: {}", sample.join(", ")),
    ])
}

/// No version with a leading component of at least `significant_major` may disappear.
///
/// Older versions may be pruned from the page. A label without a numeric
/// leading component is always treated as significant.
pub fn validate_version_consistency(
    new: &Value,
    old: &Value,
    significant_major: u32,
) -> CheckOutcome {
    let old_versions = version_set(old);
    if old_versions.is_empty() {
        return CheckOutcome::pass();
    }
    let new_versions = version_set(new);

    let significant: Vec<&str> = old_versions
        .difference(&new_versions)
        .copied()
        .filter(|v| leading_major(v).is_none_or(|major| major >= significant_major))
        .collect();

    if significant.is_empty() {
        return CheckOutcome::pass();
    }
    CheckOutcome::fail(vec![format!(
        "Version(s) disappeared from matrix: {}",
        significant.join(", ")
    )])
}
