//! Record Validator CLI
//!
//! Loads every record file under a directory, registers the records and checks
//! referential integrity.
//!
//! Exit status: 0 when the corpus is clean, 1 when any duplicate or dangling
//! reference was found, 2 when the corpus could not be loaded or the run could
//! not be set up.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use record_registry::{
    load_from_directory, LoadedCorpus, Registry, ValidationReport, ValidatorConfig,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const EXIT_VIOLATIONS: i32 = 1;
const EXIT_SETUP: i32 = 2;

#[derive(Parser)]
#[command(name = "record-validator")]
#[command(about = "Validate entity and relationship record files")]
#[command(version)]
struct Cli {
    /// Path to the folder containing record files to validate
    #[arg(short, long)]
    dir: PathBuf,

    /// Explicit config file, layered over the default locations
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a JSON report to this path
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let config = match ValidatorConfig::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load configuration: {}", e);
            std::process::exit(EXIT_SETUP);
        }
    };

    let default_filter = if cli.verbose {
        "debug"
    } else {
        config.logging.filter.as_str()
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(cli, config) {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_VIOLATIONS),
        Err(e) => {
            error!(error = %format!("{:#}", e), "Validator failed");
            std::process::exit(EXIT_SETUP);
        }
    }
}

/// Returns whether the corpus is free of violations
fn run(cli: Cli, config: ValidatorConfig) -> anyhow::Result<bool> {
    let report_path = cli.report.or(config.report.path);
    let pretty = config.report.pretty;

    let corpus = match load_from_directory(&cli.dir, &config.loader) {
        Ok(corpus) => corpus,
        Err(e) => {
            if let Some(path) = &report_path {
                ValidationReport::load_failed(&cli.dir, &e)
                    .write_to(path, pretty)
                    .with_context(|| format!("failed to write report to {}", path.display()))?;
            }
            return Err(e)
                .with_context(|| format!("failed to load records from {}", cli.dir.display()));
        }
    };
    info!(
        files = corpus.files,
        records = corpus.records.len(),
        fingerprint = %corpus.fingerprint,
        "Loaded corpus"
    );

    let LoadedCorpus {
        records,
        files,
        fingerprint,
    } = corpus;

    let mut registry = Registry::new();
    let mut violations = registry.add(records).err().unwrap_or_default();
    let stats = registry.stats();
    info!(
        entities = stats.entities,
        relationship_types = stats.relationship_types,
        relationships = stats.relationships,
        "Total registered records"
    );

    violations.extend(registry.validate().err().unwrap_or_default());

    let mut report = ValidationReport::new(&cli.dir, files, fingerprint, stats);
    report.extend_violations(violations);

    if let Some(path) = &report_path {
        report
            .write_to(path, pretty)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        info!(path = %path.display(), "Report written");
    }

    if report.is_success() {
        info!("Validation successful");
    } else {
        error!(
            duplicates = report.duplicate_count(),
            dangling_references = report.dangling_count(),
            "Validation failed"
        );
    }

    Ok(report.is_success())
}
