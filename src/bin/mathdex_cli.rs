//! mathdex CLI - index math-bearing document corpora
//!
//! # Examples
//!
//! ```bash
//! # Index a corpus, recreating the index first
//! mathdex index /data/arxiv --overwrite --threads 8
//!
//! # Index only the first 1000 files, submitting in bulk
//! mathdex index /data/arxiv --limit 1000 --submit-mode bulk
//!
//! # Remove the records of one subtree
//! mathdex delete /data/arxiv/0704 --root /data/arxiv
//!
//! # Show index statistics
//! mathdex stats
//! ```

use clap::Parser;
use mathdex::cli::output::print_failure;
use mathdex::cli::{run, Cli};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "mathdex=debug" } else { "mathdex=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr) // stdout carries command output
        .with_env_filter(filter)
        .compact()
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        print_failure(e.as_ref());
        std::process::exit(1);
    }
}
