//! Index command - index a directory, archive or document

use crate::cli::output::{count, format_duration, format_tally, location, print_field};
use crate::cli::OutputFormat;
use crate::core::config::{Config, SubmitMode};
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the index command
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Directory or file to index
    pub path: PathBuf,

    /// Prefix stripped from file paths to build record paths
    /// (defaults to the configured storage root, then PATH itself)
    #[arg(long, short = 'r')]
    pub root: Option<PathBuf>,

    /// Recreate the index before indexing
    #[arg(long, short = 'o')]
    pub overwrite: bool,

    /// Number of concurrent extraction workers
    #[arg(long, short = 't')]
    pub threads: Option<usize>,

    /// Maximum number of files to index (0 = unlimited)
    #[arg(long, short = 'l', allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Submission mode: sync, async or bulk
    #[arg(long)]
    pub submit_mode: Option<String>,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl IndexArgs {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(threads) = self.threads {
            config.indexing.threads = threads;
        }
        if let Some(limit) = self.limit {
            config.indexing.doc_limit = limit;
        }
        if let Some(mode) = &self.submit_mode {
            config.indexing.submit_mode = mode.parse::<SubmitMode>()?;
        }
        config.validate()?;
        Ok(())
    }
}

/// Indexing result response
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub path: String,
    pub index_dir: String,
    pub files_discovered: usize,
    pub files_completed: usize,
    pub records_harvested: usize,
    pub records_submitted: usize,
    pub created: usize,
    pub updated: usize,
    pub conflicts: usize,
    pub failed: usize,
    pub formulae: u64,
    pub duration_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_secs: Option<f64>,
}

/// Execute the index command
pub async fn execute(
    args: IndexArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    // Validate path
    let path = args.path.canonicalize().map_err(|e| {
        format!(
            "Invalid path '{}': {}. Make sure the path exists and is accessible.",
            args.path.display(),
            e
        )
    })?;

    if !args.quiet && format == OutputFormat::Human {
        eprintln!(
            "Indexing {} into {}...",
            location(&path.display().to_string()),
            location(&services.index_dir().display().to_string())
        );
    }

    let report = services
        .index_path(&path, args.root.as_deref(), args.overwrite)
        .await?;

    let response = IndexResponse {
        path: path.to_string_lossy().into_owned(),
        index_dir: services.index_dir().to_string_lossy().into_owned(),
        files_discovered: report.files_discovered,
        files_completed: report.files_completed,
        records_harvested: report.records_harvested,
        records_submitted: report.records_submitted,
        created: report.outcomes.created,
        updated: report.outcomes.updated,
        conflicts: report.outcomes.conflicts,
        failed: report.outcomes.failed,
        formulae: report.formulae,
        duration_secs: report.elapsed.as_secs_f64(),
        cpu_secs: report.cpu_time.map(|d| d.as_secs_f64()),
        user_secs: report.user_time.map(|d| d.as_secs_f64()),
    };

    match format {
        OutputFormat::Human => {
            println!(
                "Indexed {} files ({} records) in {}",
                count(response.files_completed),
                count(response.records_submitted),
                count(format_duration(report.elapsed))
            );
            print_field("outcomes", format_tally(&report.outcomes));
            print_field("formulae", count(response.formulae));
            if let (Some(cpu), Some(user)) = (report.cpu_time, report.user_time) {
                print_field(
                    "time",
                    format!("{} cpu, {} user", format_duration(cpu), format_duration(user)),
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
