//! Structural checks: JSON Schema conformance and non-empty fields.

use std::sync::LazyLock;

use jsonschema::{Draft, Validator};
use serde_json::{Value, json};

use crate::{CheckOutcome, is_falsy};

/// Compiled schema of `feature_matrix.json`.
static ARTIFACT_VALIDATOR: LazyLock<Validator> = LazyLock::new(|| {
    jsonschema::options()
        .with_draft(Draft::Draft7)
        .build(&artifact_schema())
        .expect("artifact schema")
});

/// JSON Schema of the published artifact.
pub fn artifact_schema() -> Value {
    json!({
        "type": "object",
        "required": ["last_updated", "versions", "features"],
        "properties": {
            "last_updated": {
                "type": "string",
                "pattern": r"^\d{4}-\d{2}-\d{2}$"
            },
            "versions": {
                "type": "array",
                "items": { "type": "string" },
                "minItems": 1
            },
            "features": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["id", "name", "category", "introduced_in", "present_in"],
                    "properties": {
                        "id": { "type": "string" },
                        "name": { "type": "string" },
                        "category": { "type": "string" },
                        "introduced_in": { "type": ["string", "null"] },
                        "deprecated_in": { "type": ["string", "null"] },
                        "present_in": {
                            "type": "array",
                            "items": { "type": "string" }
                        },
                        "docs_url": { "type": ["string", "null"] }
                    }
                }
            }
        }
    })
}

/// Check `data` against [`artifact_schema`].
pub fn validate_schema(data: &Value) -> CheckOutcome {
    let errors: Vec<String> = ARTIFACT_VALIDATOR
        .iter_errors(data)
        .map(|e| format!("Schema validation error: {e}"))
        .collect();
    CheckOutcome::from_errors(errors)
}

/// Check that versions, features, and each feature's name and category are non-empty.
pub fn validate_non_empty(data: &Value) -> CheckOutcome {
    let mut errors = Vec::new();

    if is_falsy(data.get("versions")) {
        errors.push("Versions array is empty".to_string());
    }
    if is_falsy(data.get("features")) {
        errors.push("Features array is empty".to_string());
    }

    let features = data
        .get("features")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    for (idx, feature) in features.iter().enumerate() {
        if is_falsy(feature.get("category")) {
            errors.push(format!("Feature at index {idx} has empty category"));
        }
        if is_falsy(feature.get("name")) {
            errors.push(format!("Feature at index {idx} has empty name"));
        }
    }

    CheckOutcome::from_errors(errors)
}
