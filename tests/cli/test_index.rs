//! Tests for the index CLI command
//!
//! - Indexing a corpus (human and JSON output)
//! - Overwrite and upsert behavior
//! - Error cases (invalid path, invalid overrides)

use crate::cli::test_helpers::{create_cli_test_services, index_args};
use crate::common::TestCorpus;
use mathdex::cli::commands::index::execute;
use mathdex::cli::OutputFormat;
use mathdex::core::config::{Config, SubmitMode};
use mathdex::core::indexer::Submitter;
use mathdex::core::storage::InMemoryBackend;

/// Test indexing a corpus with human output
#[tokio::test]
async fn test_index_corpus_human() {
    let (services, _storage_temp) = create_cli_test_services();
    let corpus = TestCorpus::papers();

    let result = execute(index_args(&corpus), &services, OutputFormat::Human).await;
    assert!(result.is_ok(), "Index should succeed: {:?}", result.err());
    assert_eq!(services.stats().unwrap().documents, 5);
}

/// Test indexing a corpus with JSON output
#[tokio::test]
async fn test_index_corpus_json() {
    let (services, _storage_temp) = create_cli_test_services();
    let corpus = TestCorpus::papers();

    let result = execute(index_args(&corpus), &services, OutputFormat::Json).await;
    assert!(result.is_ok(), "Index should succeed: {:?}", result.err());
}

/// Test that --overwrite replaces stale records
#[tokio::test]
async fn test_index_overwrite_drops_stale_records() {
    let (services, _storage_temp) = create_cli_test_services();
    let mut corpus = TestCorpus::papers();
    let stale = corpus.add_file("c/old.html", "<html><title>Old</title></html>");

    execute(index_args(&corpus), &services, OutputFormat::Json)
        .await
        .unwrap();
    assert_eq!(services.stats().unwrap().documents, 6);

    std::fs::remove_file(stale).unwrap();

    // Upsert keeps the record of the removed file
    execute(index_args(&corpus), &services, OutputFormat::Json)
        .await
        .unwrap();
    assert_eq!(services.stats().unwrap().documents, 6);

    let mut args = index_args(&corpus);
    args.overwrite = true;
    execute(args, &services, OutputFormat::Json).await.unwrap();
    assert_eq!(services.stats().unwrap().documents, 5);
}

/// Test indexing a path that does not exist
#[tokio::test]
async fn test_index_invalid_path() {
    let (services, _storage_temp) = create_cli_test_services();
    let corpus = TestCorpus::new();
    let mut args = index_args(&corpus);
    args.path = corpus.path().join("does-not-exist");

    let result = execute(args, &services, OutputFormat::Human).await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Invalid path"));
}

/// Test that overrides flow into the pipeline configuration
#[tokio::test]
async fn test_overrides_shape_the_run() {
    let corpus = TestCorpus::papers();
    let mut config = Config::default();
    let mut args = index_args(&corpus);
    args.limit = Some(3);
    args.threads = Some(1);
    args.submit_mode = Some("bulk".to_string());

    args.apply_overrides(&mut config).unwrap();
    assert_eq!(config.indexing.submit_mode, SubmitMode::Bulk);

    let services = mathdex::Services::new(config);
    let mut submitter = Submitter::new(InMemoryBackend::new(), services.config.indexing.submit_mode);
    let report = services
        .run_pipeline(corpus.path(), None, &mut submitter)
        .await
        .unwrap();

    assert_eq!(report.files_discovered, 3);
    assert_eq!(report.records_submitted, 4);
}
