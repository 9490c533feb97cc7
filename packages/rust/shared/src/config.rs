//! Application configuration for the feature matrix scraper.
//!
//! User config lives at `~/.featurematrix/featurematrix.toml`.
//! CLI flags override the `OUTPUT_PATH` environment variable, which overrides
//! config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{FeatureMatrixError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "featurematrix.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".featurematrix";

/// Environment variable overriding the artifact output path.
pub const OUTPUT_PATH_ENV: &str = "OUTPUT_PATH";

// ---------------------------------------------------------------------------
// Config structs (matching featurematrix.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where and how to fetch the matrix page.
    #[serde(default)]
    pub source: SourceConfig,

    /// Markup conventions of the matrix page.
    #[serde(default)]
    pub extract: ExtractConfig,

    /// Drift-check thresholds.
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Artifact location.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[source]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Page holding the feature matrix.
    #[serde(default = "default_source_url")]
    pub url: Url,

    /// Origin prepended to root-relative links (`/docs/...`).
    #[serde(default = "default_site_origin")]
    pub site_origin: String,

    /// Base that bare relative links (`detail/42/`) are appended to.
    #[serde(default = "default_detail_base_url")]
    pub detail_base_url: String,

    /// User-Agent sent with the request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            site_origin: default_site_origin(),
            detail_base_url: default_detail_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_source_url() -> Url {
    Url::parse("https://www.postgresql.org/about/featurematrix/").expect("default source URL")
}
fn default_site_origin() -> String {
    "https://www.postgresql.org".into()
}
fn default_detail_base_url() -> String {
    "https://www.postgresql.org/about/featurematrix/".into()
}
fn default_user_agent() -> String {
    concat!(
        "featurematrix-scraper/",
        env!("CARGO_PKG_VERSION"),
        " (https://github.com/sebastiansteenssoe/pgfeaturediff)"
    )
    .into()
}
fn default_timeout_secs() -> u64 {
    30
}

/// `[extract]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Class marking the matrix tables.
    #[serde(default = "default_matrix_class")]
    pub matrix_class: String,

    /// Class marking a "supported" cell.
    #[serde(default = "default_supported_class")]
    pub supported_class: String,

    /// Section headings that never hold features.
    #[serde(default = "default_skip_headings")]
    pub skip_headings: Vec<String>,

    /// Origin prepended to root-relative links. Filled from `[source]`.
    #[serde(skip, default = "default_site_origin")]
    pub site_origin: String,

    /// Base for bare relative links. Filled from `[source]`.
    #[serde(skip, default = "default_detail_base_url")]
    pub detail_base_url: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            matrix_class: default_matrix_class(),
            supported_class: default_supported_class(),
            skip_headings: default_skip_headings(),
            site_origin: default_site_origin(),
            detail_base_url: default_detail_base_url(),
        }
    }
}

fn default_matrix_class() -> String {
    "matrix".into()
}
fn default_supported_class() -> String {
    "fm_yes".into()
}
fn default_skip_headings() -> Vec<String> {
    vec!["Quick Links".into(), "PostgreSQL Feature Matrix".into()]
}

/// `[validation]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Allowed relative change in feature count (0.10 = ±10%).
    #[serde(default = "default_count_tolerance")]
    pub count_tolerance: f64,

    /// Share of previous feature names that must survive (0.90 = 90%).
    #[serde(default = "default_min_overlap")]
    pub min_overlap: f64,

    /// Versions with a leading component at or above this may not disappear.
    #[serde(default = "default_significant_major")]
    pub significant_major: u32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            count_tolerance: default_count_tolerance(),
            min_overlap: default_min_overlap(),
            significant_major: default_significant_major(),
        }
    }
}

fn default_count_tolerance() -> f64 {
    0.10
}
fn default_min_overlap() -> f64 {
    0.90
}
fn default_significant_major() -> u32 {
    10
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Artifact path.
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from("frontend/public/feature_matrix.json")
}

// ---------------------------------------------------------------------------
// Run config (runtime, merged from config + env + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime configuration for one scrape, merged from config file, env and CLI flags.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Fetch settings.
    pub source: SourceConfig,
    /// Extraction settings, with link bases copied from `source`.
    pub extract: ExtractConfig,
    /// Drift-check thresholds.
    pub validation: ValidationConfig,
    /// Final artifact path.
    pub output_path: PathBuf,
    /// Extract and validate without writing.
    pub dry_run: bool,
}

impl From<&AppConfig> for RunConfig {
    fn from(config: &AppConfig) -> Self {
        let mut extract = config.extract.clone();
        extract.site_origin = config.source.site_origin.clone();
        extract.detail_base_url = config.source.detail_base_url.clone();

        Self {
            source: config.source.clone(),
            extract,
            validation: config.validation.clone(),
            output_path: config.output.path.clone(),
            dry_run: false,
        }
    }
}

impl RunConfig {
    /// Apply the `OUTPUT_PATH` environment variable, if set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(path) = std::env::var_os(OUTPUT_PATH_ENV).filter(|p| !p.is_empty()) {
            tracing::debug!(?path, "output path overridden from environment");
            self.output_path = PathBuf::from(path);
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.featurematrix/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| FeatureMatrixError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.featurematrix/featurematrix.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| FeatureMatrixError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        FeatureMatrixError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    check_config(&config)?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| FeatureMatrixError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| FeatureMatrixError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| FeatureMatrixError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Reject thresholds that would make the drift checks meaningless.
fn check_config(config: &AppConfig) -> Result<()> {
    let v = &config.validation;
    if !(0.0..=1.0).contains(&v.count_tolerance) {
        return Err(FeatureMatrixError::config(format!(
            "validation.count_tolerance must be within 0..=1, got {}",
            v.count_tolerance
        )));
    }
    if !(0.0..=1.0).contains(&v.min_overlap) {
        return Err(FeatureMatrixError::config(format!(
            "validation.min_overlap must be within 0..=1, got {}",
            v.min_overlap
        )));
    }
    if config.source.timeout_secs == 0 {
        return Err(FeatureMatrixError::config("source.timeout_secs must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("featurematrix"));
        assert!(toml_str.contains("fm_yes"));
        assert!(toml_str.contains("feature_matrix.json"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.source.timeout_secs, 30);
        assert_eq!(parsed.extract.matrix_class, "matrix");
        assert_eq!(parsed.validation.significant_major, 10);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let toml_str = r#"
[validation]
min_overlap = 0.8

[output]
path = "/tmp/matrix.json"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.validation.min_overlap, 0.8);
        assert_eq!(config.validation.count_tolerance, 0.10);
        assert_eq!(config.output.path, PathBuf::from("/tmp/matrix.json"));
        assert_eq!(config.extract.skip_headings.len(), 2);
    }

    #[test]
    fn run_config_copies_link_bases() {
        let mut app = AppConfig::default();
        app.source.site_origin = "https://mirror.example".into();
        let run = RunConfig::from(&app);
        assert_eq!(run.extract.site_origin, "https://mirror.example");
        assert_eq!(run.extract.detail_base_url, app.source.detail_base_url);
        assert!(!run.dry_run);
    }

    #[test]
    fn output_path_env_overrides_file() {
        let app = AppConfig::default();
        // SAFETY: no other test in this crate reads or writes OUTPUT_PATH.
        unsafe { std::env::set_var(OUTPUT_PATH_ENV, "/srv/site/feature_matrix.json") };
        let run = RunConfig::from(&app).with_env_overrides();
        unsafe { std::env::remove_var(OUTPUT_PATH_ENV) };

        assert_eq!(run.output_path, PathBuf::from("/srv/site/feature_matrix.json"));
        assert_eq!(
            RunConfig::from(&app).with_env_overrides().output_path,
            app.output.path
        );
    }

    #[test]
    fn out_of_range_threshold_rejected() {
        let mut config = AppConfig::default();
        config.validation.min_overlap = 1.5;
        let err = check_config(&config).unwrap_err();
        assert!(err.to_string().contains("min_overlap"));
    }

    #[test]
    fn load_config_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[source]\ntimeout_secs = 5\n").expect("write");
        let config = load_config_from(&path).expect("load");
        assert_eq!(config.source.timeout_secs, 5);
    }
}
