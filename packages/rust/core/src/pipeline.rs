//! End-to-end run: fetch → extract → validate → publish.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use serde_json::Value;
use tracing::{info, instrument, warn};

use featurematrix_extract::{ExtractOutcome, HtmlDocument, SkippedRow, extract_dataset};
use featurematrix_fetch::{FetchOptions, fetch_page};
use featurematrix_shared::{Dataset, ExtractConfig, FeatureMatrixError, Result, RunConfig};
use featurematrix_validate::{ValidationReport, validate_feature_data};

use crate::artifact;

/// A freshly extracted dataset.
#[derive(Debug, Clone)]
pub struct ScrapeResult {
    pub dataset: Dataset,
    /// Rows skipped because their cells did not line up with the versions.
    pub skipped_rows: Vec<SkippedRow>,
}

/// What `publish` decided.
#[derive(Debug, Clone)]
pub struct PublishResult {
    /// Validation messages, including those downgraded to warnings.
    pub report: ValidationReport,
    /// No previous artifact was available to compare against.
    pub bootstrap: bool,
    /// Whether the artifact was written.
    pub written: bool,
}

/// Summary of a complete run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub versions: usize,
    pub features: usize,
    pub categories: usize,
    pub skipped_rows: usize,
    pub warnings: Vec<String>,
    pub bootstrap: bool,
    pub written: bool,
    pub output_path: PathBuf,
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called for each non-fatal problem (skipped rows, downgraded validation errors).
    fn warning(&self, message: &str);
    /// Called when the run completes.
    fn done(&self, summary: &RunSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn warning(&self, _message: &str) {}
    fn done(&self, _summary: &RunSummary) {}
}

/// Extract a dataset from an already fetched page.
pub fn scrape_html(html: &str, config: &ExtractConfig, today: NaiveDate) -> Result<ScrapeResult> {
    let doc = HtmlDocument::parse(html, config);
    let ExtractOutcome {
        dataset,
        skipped_rows,
    } = extract_dataset(&doc, config, today)?;
    Ok(ScrapeResult {
        dataset,
        skipped_rows,
    })
}

/// Fetch the configured page and parse it.
pub async fn fetch_document(config: &RunConfig) -> Result<HtmlDocument> {
    let html = fetch_page(&FetchOptions::from(&config.source)).await?;
    Ok(HtmlDocument::parse(&html, &config.extract))
}

/// Fetch the matrix page and extract a dataset dated today.
#[instrument(skip_all, fields(url = %config.source.url))]
pub async fn scrape(config: &RunConfig, progress: &dyn ProgressReporter) -> Result<ScrapeResult> {
    progress.phase("Fetching feature matrix");
    let doc = fetch_document(config).await?;

    progress.phase("Extracting features");
    let ExtractOutcome {
        dataset,
        skipped_rows,
    } = extract_dataset(&doc, &config.extract, Local::now().date_naive())?;
    for row in &skipped_rows {
        progress.warning(&row.to_string());
    }
    Ok(ScrapeResult {
        dataset,
        skipped_rows,
    })
}

/// Validate `dataset` against `previous` and write it unless validation blocks it.
///
/// With a previous artifact any validation error blocks publication and
/// nothing is written. Without one (bootstrap), errors are only warnings.
#[instrument(skip_all, fields(output = %config.output_path.display()))]
pub fn publish(
    config: &RunConfig,
    dataset: &Dataset,
    previous: Option<&Value>,
    progress: &dyn ProgressReporter,
) -> Result<PublishResult> {
    progress.phase("Validating scraped data");
    let new_value = artifact::to_json_value(dataset)?;
    let report = validate_feature_data(&new_value, previous, &config.validation);
    let bootstrap = previous.is_none();

    if !report.is_valid() {
        for error in &report.errors {
            warn!(%error, "validation failed");
        }
        if !bootstrap {
            return Err(FeatureMatrixError::validation(format!(
                "{} problem(s) against the published artifact: {}",
                report.errors.len(),
                report.errors.join("; ")
            )));
        }
        warn!("no existing data found, saving initial dataset");
        for error in &report.errors {
            progress.warning(error);
        }
    } else {
        info!("validation passed");
    }

    if config.dry_run {
        info!("dry run, artifact not written");
        return Ok(PublishResult {
            report,
            bootstrap,
            written: false,
        });
    }

    progress.phase("Saving data");
    artifact::save_dataset(&config.output_path, dataset)?;

    Ok(PublishResult {
        report,
        bootstrap,
        written: true,
    })
}

/// Run the whole pipeline once.
#[instrument(skip_all, fields(url = %config.source.url))]
pub async fn run(config: &RunConfig, progress: &dyn ProgressReporter) -> Result<RunSummary> {
    let start = Instant::now();
    info!("starting feature matrix scrape");

    let ScrapeResult {
        dataset,
        skipped_rows,
    } = scrape(config, progress).await?;

    let previous = artifact::load_previous(&config.output_path);
    let outcome = publish(config, &dataset, previous.as_ref(), progress)?;

    let mut warnings: Vec<String> = skipped_rows.iter().map(ToString::to_string).collect();
    warnings.extend(outcome.report.errors);

    let summary = RunSummary {
        versions: dataset.versions.len(),
        features: dataset.features.len(),
        categories: dataset.category_count(),
        skipped_rows: skipped_rows.len(),
        warnings,
        bootstrap: outcome.bootstrap,
        written: outcome.written,
        output_path: config.output_path.clone(),
        elapsed: start.elapsed(),
    };

    info!(
        versions = summary.versions,
        features = summary.features,
        categories = summary.categories,
        "scrape complete"
    );
    progress.done(&summary);
    Ok(summary)
}
