// Integration tests for indexing into Tantivy

use crate::common::{assert_valid_report, create_test_services, test_config, TestCorpus};
use mathdex::core::config::SubmitMode;
use mathdex::core::services::Services;
use mathdex::core::storage::{SearchBackend, TantivyBackend};

#[tokio::test]
async fn test_index_papers_corpus() {
    let corpus = TestCorpus::papers();
    let services = create_test_services();

    let report = services.index_path(corpus.path(), None, true).await.unwrap();

    assert_valid_report(&report);
    assert_eq!(report.files_discovered, 4);
    assert_eq!(report.files_completed, 4);
    assert_eq!(report.records_submitted, 5);
    assert_eq!(report.outcomes.created, 5);

    let backend = TantivyBackend::open(services.index_dir()).unwrap();
    let stats = backend.stats().unwrap();
    assert_eq!(stats.documents, 5);
    assert!(stats.indexed_bytes > 0);
    assert!(stats.storage_bytes > 0);
    assert_eq!(stats.index_dir.as_deref(), Some(services.index_dir()));

    assert_eq!(backend.count_matching("path", "b/bundle.zip").unwrap(), 2);
    assert_eq!(backend.count_matching("id", "b/bundle.zip/y.html").unwrap(), 1);
    assert_eq!(backend.count_matching("archivepath", "x.html").unwrap(), 1);
}

#[tokio::test]
async fn test_math_tokens_reach_the_index() {
    let corpus = TestCorpus::papers();
    let services = create_test_services();

    services.index_path(corpus.path(), None, true).await.unwrap();

    let backend = TantivyBackend::open(services.index_dir()).unwrap();
    assert_eq!(backend.count_matching("pmath", "mi(x)").unwrap(), 1);
    assert_eq!(backend.count_matching("pmath", "mn(2)").unwrap(), 5);
    assert_eq!(backend.count_matching("cmath", "ci(z)").unwrap(), 1);
    assert_eq!(backend.count_matching("pmath", "ci(z)").unwrap(), 0);
}

#[tokio::test]
async fn test_reindex_without_overwrite_updates() {
    let corpus = TestCorpus::papers();
    let services = create_test_services();

    let first = services.index_path(corpus.path(), None, false).await.unwrap();
    let second = services.index_path(corpus.path(), None, false).await.unwrap();

    assert_eq!(first.outcomes.created, 5);
    assert_eq!(second.outcomes.created, 0);
    assert_eq!(second.outcomes.updated, 5);
    assert_eq!(services.stats().unwrap().documents, 5);
}

#[tokio::test]
async fn test_overwrite_recreates_index() {
    let corpus = TestCorpus::papers();
    let services = create_test_services();

    services.index_path(corpus.path(), None, true).await.unwrap();
    let again = services.index_path(corpus.path(), None, true).await.unwrap();

    assert_eq!(again.outcomes.created, 5);
    assert_eq!(again.outcomes.updated, 0);
    assert_eq!(services.stats().unwrap().documents, 5);
}

#[tokio::test]
async fn test_submit_modes_against_tantivy() {
    for mode in [SubmitMode::Sync, SubmitMode::Async, SubmitMode::Bulk] {
        let corpus = TestCorpus::papers();
        let services = Services::new(test_config(2, mode));

        let report = services.index_path(corpus.path(), None, true).await.unwrap();

        assert_eq!(report.records_submitted, 5, "mode {mode}");
        assert_eq!(services.stats().unwrap().documents, 5, "mode {mode}");
    }
}

#[tokio::test]
async fn test_index_subtree_with_explicit_root() {
    let corpus = TestCorpus::papers();
    let services = create_test_services();

    let report = services
        .index_path(&corpus.path().join("b"), Some(corpus.path()), true)
        .await
        .unwrap();

    assert_eq!(report.files_discovered, 2);
    let backend = TantivyBackend::open(services.index_dir()).unwrap();
    assert_eq!(backend.count_matching("id", "b/three.html").unwrap(), 1);
    assert_eq!(backend.count_matching("id", "three.html").unwrap(), 0);
}

#[tokio::test]
async fn test_index_single_file() {
    let corpus = TestCorpus::papers();
    let services = create_test_services();

    let report = services
        .index_path(&corpus.path().join("a/two.html"), None, true)
        .await
        .unwrap();

    assert_eq!(report.records_submitted, 1);
    let backend = TantivyBackend::open(services.index_dir()).unwrap();
    assert_eq!(backend.count_matching("id", "two.html").unwrap(), 1);
}
