//! Optimize command - merge index segments

use crate::cli::commands::stats::print_stats;
use crate::cli::output::{count, format_duration};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use std::sync::Arc;
use std::time::Instant;

/// Arguments for the optimize command
#[derive(Args, Debug)]
pub struct OptimizeArgs {}

/// Execute the optimize command
pub async fn execute(
    _args: OptimizeArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let stats = services.optimize()?;

    if format == OutputFormat::Human {
        println!(
            "Optimized in {}",
            count(format_duration(start.elapsed()))
        );
    }
    print_stats(&stats, format)
}
