//! Delete-index command - remove the on-disk index

use crate::cli::output::{location, print_success, print_warning};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Arguments for the delete-index command
#[derive(Args, Debug)]
pub struct DeleteIndexArgs {
    /// Confirm deletion
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Recreate an empty index after deleting
    #[arg(long)]
    pub recreate: bool,
}

/// Delete-index result response
#[derive(Debug, Serialize)]
pub struct DeleteIndexResponse {
    pub index_dir: String,
    pub deleted: bool,
    pub recreated: bool,
}

/// Execute the delete-index command
pub async fn execute(
    args: DeleteIndexArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if !args.yes {
        return Err(format!(
            "Refusing to delete {} without --yes.",
            services.index_dir().display()
        )
        .into());
    }

    let deleted = services.delete_index()?;
    if args.recreate {
        services.create_index()?;
    }

    let response = DeleteIndexResponse {
        index_dir: services.index_dir().to_string_lossy().into_owned(),
        deleted,
        recreated: args.recreate,
    };

    match format {
        OutputFormat::Human => {
            if response.deleted {
                print_success(&format!("Deleted index {}", location(&response.index_dir)));
            } else {
                print_warning(&format!("No index at {}", response.index_dir));
            }
            if response.recreated {
                print_success("Created empty index");
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
