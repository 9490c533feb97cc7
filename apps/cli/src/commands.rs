//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use featurematrix_core::artifact::{load_artifact, load_previous};
use featurematrix_core::pipeline::{ProgressReporter, RunSummary};
use featurematrix_shared::{AppConfig, RunConfig, init_config, load_config, load_config_from};
use featurematrix_validate::validate_feature_data;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use url::Url;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// featurematrix: scrape the PostgreSQL Feature Matrix into JSON.
#[derive(Parser)]
#[command(
    name = "featurematrix",
    version,
    about = "Scrape the PostgreSQL Feature Matrix into a validated JSON artifact.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.featurematrix/featurematrix.toml.
    #[arg(long, global = true, env = "FEATUREMATRIX_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Fetch the matrix, validate it, and write the artifact.
    Scrape {
        /// Artifact path (overrides OUTPUT_PATH and the config file).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Matrix page URL.
        #[arg(long)]
        url: Option<String>,

        /// Extract and validate, but do not write the artifact.
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate an existing artifact, optionally against a baseline.
    Validate {
        /// Artifact to check.
        file: PathBuf,

        /// Previously published artifact to compare against.
        #[arg(long)]
        previous: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "featurematrix=info",
        1 => "featurematrix=debug",
        _ => "featurematrix=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config;
    match cli.command {
        Command::Scrape {
            output,
            url,
            dry_run,
        } => {
            let config = resolve_config(config_path.as_deref())?;
            cmd_scrape(&config, output, url.as_deref(), dry_run).await
        }
        Command::Validate { file, previous } => {
            let config = resolve_config(config_path.as_deref())?;
            cmd_validate(&config, &file, previous.as_deref())
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path.as_deref()),
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

/// Merge flags over env over file over defaults.
fn run_config(
    config: &AppConfig,
    output: Option<PathBuf>,
    url: Option<&str>,
    dry_run: bool,
) -> Result<RunConfig> {
    let mut run = RunConfig::from(config).with_env_overrides();
    if let Some(output) = output {
        run.output_path = output;
    }
    if let Some(url) = url {
        run.source.url = Url::parse(url).map_err(|e| eyre!("invalid URL '{url}': {e}"))?;
    }
    run.dry_run = dry_run;
    Ok(run)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_scrape(
    config: &AppConfig,
    output: Option<PathBuf>,
    url: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    let run_config = run_config(config, output, url, dry_run)?;

    info!(
        url = %run_config.source.url,
        output = %run_config.output_path.display(),
        dry_run,
        "scraping feature matrix"
    );

    let reporter = CliProgress::new();
    let result = featurematrix_core::pipeline::run(&run_config, &reporter).await;
    reporter.finish();
    let summary = result.wrap_err("scrape failed")?;

    println!();
    if summary.written {
        println!("  Feature matrix saved to {}", summary.output_path.display());
    } else {
        println!("  Dry run: nothing written");
    }
    println!("  Versions:   {}", summary.versions);
    println!("  Features:   {}", summary.features);
    println!("  Categories: {}", summary.categories);
    if summary.skipped_rows > 0 {
        println!("  Skipped:    {} row(s)", summary.skipped_rows);
    }
    if summary.bootstrap {
        println!("  Bootstrap:  no previous artifact to compare against");
    }
    println!("  Time:       {:.1}s", summary.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_validate(config: &AppConfig, file: &Path, previous: Option<&Path>) -> Result<()> {
    let new = load_artifact(file)?;
    let old = previous.and_then(load_previous);
    if previous.is_some() && old.is_none() {
        println!("No baseline loaded, skipping comparison checks");
    }

    let report = validate_feature_data(&new, old.as_ref(), &config.validation);
    if report.is_valid() {
        println!("Validation passed: {}", file.display());
        return Ok(());
    }

    eprintln!("Validation failed: {}", file.display());
    for error in &report.errors {
        eprintln!("  - {error}");
    }
    Err(eyre!("{} validation error(s)", report.errors.len()))
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn warning(&self, message: &str) {
        self.spinner.println(format!("  warning: {message}"));
    }

    fn done(&self, _summary: &RunSummary) {
        self.spinner.finish_and_clear();
    }
}
