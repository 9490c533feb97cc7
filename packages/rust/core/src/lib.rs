//! Pipeline orchestration for the feature matrix scraper.
//!
//! Ties fetching, extraction, and validation together and owns the
//! published `feature_matrix.json` artifact.

pub mod artifact;
pub mod pipeline;

pub use pipeline::{
    ProgressReporter, PublishResult, RunSummary, ScrapeResult, SilentProgress, fetch_document,
    publish, run, scrape, scrape_html,
};
