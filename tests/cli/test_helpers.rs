//! CLI test helpers
//!
//! Arc<Services> wrappers matching CLI execute() signatures

use crate::common::TestCorpus;
use mathdex::cli::commands::index::{execute, IndexArgs};
use mathdex::cli::OutputFormat;
use mathdex::core::config::Config;
use mathdex::core::services::Services;
use std::sync::Arc;
use tempfile::TempDir;

/// Create test services wrapped in Arc (matching CLI execute() signatures)
pub fn create_cli_test_services() -> (Arc<Services>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = Config::default();
    config.storage.index_dir = temp_dir.path().join("index");
    config.indexing.threads = 2;

    let services = Arc::new(Services::new(config));
    (services, temp_dir)
}

/// Index arguments for `corpus` with every option at its default
pub fn index_args(corpus: &TestCorpus) -> IndexArgs {
    IndexArgs {
        path: corpus.path().to_path_buf(),
        root: None,
        overwrite: false,
        threads: None,
        limit: None,
        submit_mode: None,
        quiet: true,
    }
}

/// Index `corpus` through the CLI handler
pub async fn setup_indexed_corpus(services: &Arc<Services>, corpus: &TestCorpus) {
    execute(index_args(corpus), services, OutputFormat::Json)
        .await
        .expect("Failed to index test corpus");
}
