//! CLI adapter for mathdex
//!
//! Provides the command-line interface for indexing corpora and
//! maintaining the on-disk index. Depends on `core/`; nothing in
//! `core/` depends on this module.
//!
//! # Architecture
//!
//! ```text
//! +------------------+      +------------------+
//! |      cli/        | ---> |     core/        |
//! | (clap adapter)   |      |  (domain logic)  |
//! +------------------+      +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// mathdex - math-aware document indexer
///
/// Extracts title, authors, body text and MathML formula tokens from
/// HTML/XML documents and zip archives of them, and writes one record
/// per document into a Tantivy index.
#[derive(Parser, Debug)]
#[command(name = "mathdex")]
#[command(version)]
#[command(about = "Math-aware document indexer", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index a directory, archive or single document
    Index(commands::IndexArgs),

    /// Delete the records of files below a path
    Delete(commands::DeleteArgs),

    /// Remove the on-disk index
    #[command(name = "delete-index")]
    DeleteIndex(commands::DeleteIndexArgs),

    /// Show index statistics
    Stats(commands::StatsArgs),

    /// Merge index segments
    Optimize(commands::OptimizeArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  mathdex completions bash > ~/.local/share/bash-completion/completions/mathdex
    ///   zsh:   mathdex completions zsh > ~/.zfunc/_mathdex
    ///   fish:  mathdex completions fish > ~/.config/fish/completions/mathdex.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::services::Services;
    use crate::core::xdg::XdgDirs;
    use std::sync::Arc;

    // Handle completions command early (doesn't need services)
    let command = match cli.command {
        Commands::Completions(args) => return commands::completions::execute(args),
        command => command,
    };

    let xdg = XdgDirs::new();
    xdg.log_paths();

    let mut config = Config::load_with_xdg(&xdg)?;
    if let Commands::Index(args) = &command {
        args.apply_overrides(&mut config)?;
    }
    config.log_config();

    let services = Arc::new(Services::new(config));

    match command {
        Commands::Index(args) => commands::index::execute(args, &services, cli.format).await,
        Commands::Delete(args) => commands::delete::execute(args, &services, cli.format).await,
        Commands::DeleteIndex(args) => {
            commands::delete_index::execute(args, &services, cli.format).await
        }
        Commands::Stats(args) => commands::stats::execute(args, &services, cli.format).await,
        Commands::Optimize(args) => commands::optimize::execute(args, &services, cli.format).await,
        Commands::ShowConfig(args) => {
            commands::config::execute(args, &services, &xdg, cli.format).await
        }
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
