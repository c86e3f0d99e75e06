//! Delete command - remove the records of a file or subtree

use crate::cli::output::{count, location};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the delete command
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// File or directory whose records are removed; a path that does
    /// not exist is matched literally against the `path` field
    pub path: PathBuf,

    /// Prefix stripped from file paths (as used when indexing)
    #[arg(long, short = 'r')]
    pub root: Option<PathBuf>,
}

/// Delete result response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub path: String,
    pub removed: u64,
}

/// Execute the delete command
pub async fn execute(
    args: DeleteArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = args.path.canonicalize().unwrap_or_else(|_| args.path.clone());
    let removed = services.delete_path(&path, args.root.as_deref())?;

    let response = DeleteResponse {
        path: path.to_string_lossy().into_owned(),
        removed,
    };

    match format {
        OutputFormat::Human => {
            println!(
                "Deleted {} records for {}",
                count(response.removed),
                location(&response.path)
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
