//! Shared types, error model, and configuration for the feature matrix scraper.
//!
//! This crate is the foundation depended on by all other workspace crates.
//! It provides:
//! - [`FeatureMatrixError`]: the unified error type
//! - Artifact types ([`Dataset`], [`Feature`])
//! - Configuration ([`AppConfig`], [`RunConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ExtractConfig, OUTPUT_PATH_ENV, OutputConfig, RunConfig, SourceConfig,
    ValidationConfig, config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{FeatureMatrixError, Result};
pub use types::{DATE_FORMAT, Dataset, Feature};
