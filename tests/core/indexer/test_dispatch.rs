// Discovery and dispatch over real files

use crate::common::{paper_html, TestCorpus};
use mathdex::core::indexer::record::fields;
use mathdex::core::indexer::{Discovery, Dispatcher, Extractor};

#[test]
fn test_discovery_order_and_relative_paths() {
    let corpus = TestCorpus::papers();
    let discovery = Discovery::new(corpus.path(), None, 10).unwrap();

    let tasks = discovery.discover(corpus.path()).unwrap();
    let paths: Vec<&str> = tasks.iter().map(|t| t.root_relative_path.as_str()).collect();
    assert_eq!(
        paths,
        ["a/one.html", "a/two.html", "b/bundle.zip", "b/three.html"]
    );
    assert_eq!(tasks[2].extension, "zip");
    assert!(tasks.iter().all(|t| t.absolute_path.is_absolute()));
}

#[test]
fn test_discovery_of_subtree_keeps_root_prefix_removed() {
    let corpus = TestCorpus::papers();
    let discovery = Discovery::new(corpus.path(), None, 10).unwrap();

    let tasks = discovery.discover(&corpus.path().join("b")).unwrap();
    let paths: Vec<&str> = tasks.iter().map(|t| t.root_relative_path.as_str()).collect();
    assert_eq!(paths, ["b/bundle.zip", "b/three.html"]);
}

#[test]
fn test_dispatch_archive_shares_one_handle() {
    let corpus = TestCorpus::papers();
    let discovery = Discovery::new(corpus.path(), None, 10).unwrap();
    let task = discovery
        .task_for(corpus.path().join("b/bundle.zip").canonicalize().unwrap())
        .unwrap();

    let records = Dispatcher::default().build_records(&task);

    let ids: Vec<&str> = records.iter().filter_map(|r| r.id()).collect();
    assert_eq!(ids, ["b/bundle.zip/x.html", "b/bundle.zip/y.html"]);
    assert!(records
        .iter()
        .all(|r| r.text(fields::PATH) == Some("b/bundle.zip")));
}

#[test]
fn test_dispatch_plain_text() {
    let mut corpus = TestCorpus::new();
    corpus.add_file("notes.txt", "E = mc^2");
    let discovery = Discovery::new(corpus.path(), None, 10).unwrap();
    let tasks = discovery.discover(corpus.path()).unwrap();

    let records = Dispatcher::default().build_records(&tasks[0]);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text(fields::CONTENT), Some("E = mc^2"));
    assert!(!records[0].contains(fields::PRESENTATION_MATH));
}

#[test]
fn test_dispatch_uppercase_extension() {
    let mut corpus = TestCorpus::new();
    corpus.add_file("PAPER.HTML", &paper_html("Upper", "Sofia", "u"));
    let discovery = Discovery::new(corpus.path(), None, 10).unwrap();
    let tasks = discovery.discover(corpus.path()).unwrap();

    assert_eq!(tasks[0].extension, "html");
    assert_eq!(Dispatcher::default().build_records(&tasks[0]).len(), 1);
}

