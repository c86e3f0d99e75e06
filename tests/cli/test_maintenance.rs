//! Tests for index maintenance commands
//!
//! - delete: records below a path
//! - delete-index: confirmation and recreation
//! - stats, optimize, show-config

use crate::cli::test_helpers::{create_cli_test_services, setup_indexed_corpus};
use crate::common::TestCorpus;
use mathdex::cli::commands::{config, delete, delete_index, optimize, stats};
use mathdex::cli::commands::{
    ConfigArgs, DeleteArgs, DeleteIndexArgs, OptimizeArgs, StatsArgs,
};
use mathdex::cli::OutputFormat;
use mathdex::core::xdg::XdgDirs;

#[tokio::test]
async fn test_delete_subtree() {
    let (services, _storage_temp) = create_cli_test_services();
    let corpus = TestCorpus::papers();
    setup_indexed_corpus(&services, &corpus).await;

    let args = DeleteArgs {
        path: corpus.path().join("a"),
        root: Some(corpus.path().to_path_buf()),
    };
    let result = delete::execute(args, &services, OutputFormat::Json).await;

    assert!(result.is_ok(), "Delete should succeed: {:?}", result.err());
    assert_eq!(services.stats().unwrap().documents, 3);
}

#[tokio::test]
async fn test_delete_index_requires_confirmation() {
    let (services, _storage_temp) = create_cli_test_services();
    let corpus = TestCorpus::papers();
    setup_indexed_corpus(&services, &corpus).await;

    let refused = delete_index::execute(
        DeleteIndexArgs {
            yes: false,
            recreate: false,
        },
        &services,
        OutputFormat::Human,
    )
    .await;
    assert!(refused.is_err());
    assert!(services.index_dir().exists());

    let deleted = delete_index::execute(
        DeleteIndexArgs {
            yes: true,
            recreate: false,
        },
        &services,
        OutputFormat::Human,
    )
    .await;
    assert!(deleted.is_ok());
    assert!(!services.index_dir().exists());
}

#[tokio::test]
async fn test_delete_index_and_recreate() {
    let (services, _storage_temp) = create_cli_test_services();
    let corpus = TestCorpus::papers();
    setup_indexed_corpus(&services, &corpus).await;

    let args = DeleteIndexArgs {
        yes: true,
        recreate: true,
    };
    delete_index::execute(args, &services, OutputFormat::Json)
        .await
        .unwrap();

    assert_eq!(services.stats().unwrap().documents, 0);
}

#[tokio::test]
async fn test_stats_and_optimize() {
    let (services, _storage_temp) = create_cli_test_services();
    let corpus = TestCorpus::papers();
    setup_indexed_corpus(&services, &corpus).await;

    for format in [OutputFormat::Human, OutputFormat::Json] {
        assert!(stats::execute(StatsArgs {}, &services, format).await.is_ok());
        assert!(optimize::execute(OptimizeArgs {}, &services, format)
            .await
            .is_ok());
    }
    assert_eq!(services.stats().unwrap().documents, 5);
}

#[tokio::test]
async fn test_stats_without_index_fails() {
    let (services, _storage_temp) = create_cli_test_services();

    let result = stats::execute(StatsArgs {}, &services, OutputFormat::Human).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_show_config() {
    let (services, storage_temp) = create_cli_test_services();
    let xdg = XdgDirs {
        config_dir: storage_temp.path().join("config"),
        data_dir: storage_temp.path().join("data"),
    };

    for format in [OutputFormat::Human, OutputFormat::Json] {
        let result = config::execute(ConfigArgs {}, &services, &xdg, format).await;
        assert!(result.is_ok());
    }
}
