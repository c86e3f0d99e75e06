// Delete, optimize and index directory lifecycle

use crate::common::{create_test_services, TestCorpus};
use mathdex::core::storage::{SearchBackend, TantivyBackend};
use std::path::Path;

#[tokio::test]
async fn test_delete_subtree_removes_its_records() {
    let corpus = TestCorpus::papers();
    let services = create_test_services();
    services.index_path(corpus.path(), None, true).await.unwrap();

    let removed = services
        .delete_path(&corpus.path().join("b"), Some(corpus.path()))
        .unwrap();

    assert_eq!(removed, 3);
    let backend = TantivyBackend::open(services.index_dir()).unwrap();
    assert_eq!(backend.stats().unwrap().documents, 2);
    assert_eq!(backend.count_matching("path", "a/one.html").unwrap(), 1);
}

#[tokio::test]
async fn test_delete_archive_removes_every_entry() {
    let corpus = TestCorpus::papers();
    let services = create_test_services();
    services.index_path(corpus.path(), None, true).await.unwrap();

    let removed = services
        .delete_path(&corpus.path().join("b/bundle.zip"), Some(corpus.path()))
        .unwrap();

    assert_eq!(removed, 2);
    assert_eq!(services.stats().unwrap().documents, 3);
}

#[tokio::test]
async fn test_delete_missing_path_matches_literally() {
    let corpus = TestCorpus::papers();
    let services = create_test_services();
    services.index_path(corpus.path(), None, true).await.unwrap();

    // Removed from disk after indexing
    std::fs::remove_file(corpus.path().join("a/two.html")).unwrap();

    assert_eq!(services.delete_path(Path::new("a/two.html"), None).unwrap(), 1);
    assert_eq!(services.delete_path(Path::new("a/two.html"), None).unwrap(), 0);
    assert_eq!(services.stats().unwrap().documents, 4);
}

#[tokio::test]
async fn test_optimize_keeps_documents() {
    let corpus = TestCorpus::papers();
    let services = create_test_services();
    services
        .index_path(&corpus.path().join("a"), Some(corpus.path()), false)
        .await
        .unwrap();
    services
        .index_path(&corpus.path().join("b"), Some(corpus.path()), false)
        .await
        .unwrap();

    let stats = services.optimize().unwrap();

    assert_eq!(stats.documents, 5);
    let backend = TantivyBackend::open(services.index_dir()).unwrap();
    assert_eq!(backend.segment_count().unwrap(), 1);
}

#[test]
fn test_delete_and_recreate_index() {
    let services = create_test_services();

    assert!(!services.delete_index().unwrap());
    services.create_index().unwrap();
    assert!(services.index_dir().join("meta.json").exists());
    assert_eq!(services.stats().unwrap().documents, 0);

    assert!(services.delete_index().unwrap());
    assert!(!services.index_dir().exists());
    assert!(services.stats().is_err());
}
