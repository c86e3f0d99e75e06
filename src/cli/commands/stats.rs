//! Stats command - show index statistics

use crate::cli::output::{count, format_bytes, location, print_field, print_header};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::BackendStats;
use clap::Args;
use std::sync::Arc;

/// Arguments for the stats command
#[derive(Args, Debug)]
pub struct StatsArgs {}

/// Execute the stats command
pub async fn execute(
    _args: StatsArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let stats = services.stats()?;
    print_stats(&stats, format)
}

/// Print backend statistics in the requested format
pub fn print_stats(
    stats: &BackendStats,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Human => {
            print_header("Index statistics");
            if let Some(dir) = &stats.index_dir {
                print_field("location", location(&dir.display().to_string()));
            }
            print_field("documents", count(stats.documents));
            print_field(
                "indexed files",
                format!("{} ({} bytes)", count(format_bytes(stats.indexed_bytes)), stats.indexed_bytes),
            );
            print_field("index size", format_bytes(stats.storage_bytes));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(stats)?);
        }
    }

    Ok(())
}
