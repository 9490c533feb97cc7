//! Reading and writing `feature_matrix.json`.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

use featurematrix_shared::{Dataset, FeatureMatrixError, Result};

/// Load the previously published artifact as raw JSON.
///
/// A missing, unreadable, unparsable, or empty artifact yields `None`, which
/// puts the run in bootstrap mode.
pub fn load_previous(path: &Path) -> Option<Value> {
    if !path.exists() {
        debug!(path = %path.display(), "no previous artifact");
        return None;
    }

    let value = match load_artifact(path) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "could not load existing data");
            return None;
        }
    };

    match &value {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        _ => Some(value),
    }
}

/// Read and parse a JSON artifact, failing on any problem.
pub fn load_artifact(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|e| FeatureMatrixError::io(path, e))?;
    serde_json::from_str(&content)
        .map_err(|e| FeatureMatrixError::parse(format!("invalid JSON in {}: {e}", path.display())))
}

/// Serialize a dataset the way it is published.
pub fn to_json_value(dataset: &Dataset) -> Result<Value> {
    serde_json::to_value(dataset).map_err(|e| FeatureMatrixError::Serialization(e.to_string()))
}

/// Write the dataset to `path`, replacing any existing file.
///
/// Parent directories are created. The JSON is written to a temp file in the
/// same directory and renamed over the target, so readers never see a
/// partial artifact.
pub fn save_dataset(path: &Path, dataset: &Dataset) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| FeatureMatrixError::io(parent, e))?;
    }

    let json = serde_json::to_string_pretty(dataset)
        .map_err(|e| FeatureMatrixError::Serialization(e.to_string()))?;

    let file_name = path
        .file_name()
        .ok_or_else(|| FeatureMatrixError::config(format!("not a file path: {}", path.display())))?;
    let temp = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

    std::fs::write(&temp, json).map_err(|e| FeatureMatrixError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| FeatureMatrixError::io(path, e))?;

    info!(path = %path.display(), "data saved");
    Ok(())
}
