// Test helper functions

use mathdex::core::config::{Config, SubmitMode};
use mathdex::core::indexer::Submitter;
use mathdex::core::services::Services;
use mathdex::core::storage::InMemoryBackend;
use mathdex::core::types::RunReport;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Configuration with a throwaway index directory
#[allow(dead_code)] // Used in integration tests
pub fn test_config(threads: usize, mode: SubmitMode) -> Config {
    let mut config = Config::default();

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    config.storage.index_dir = temp_dir.path().join("index");
    // Keep temp dir alive for duration of test
    std::mem::forget(temp_dir);

    config.indexing.threads = threads;
    config.indexing.submit_mode = mode;
    config
}

/// Create test services with temporary storage
#[allow(dead_code)] // Used in integration tests
pub fn create_test_services() -> Services {
    Services::new(test_config(2, SubmitMode::Sync))
}

/// Run the pipeline over `path` into a fresh in-memory backend
#[allow(dead_code)] // Used in integration tests
pub async fn index_in_memory(
    services: &Services,
    path: &Path,
    backend: InMemoryBackend,
) -> (RunReport, Arc<Mutex<InMemoryBackend>>) {
    let mut submitter = Submitter::new(backend, services.config.indexing.submit_mode);
    let report = services
        .run_pipeline(path, None, &mut submitter)
        .await
        .expect("pipeline run failed");
    (report, submitter.backend())
}

/// Assert that a run report is internally consistent
#[allow(dead_code)] // Used in integration tests
pub fn assert_valid_report(report: &RunReport) {
    assert!(
        report.files_completed <= report.files_discovered,
        "Completed {} of only {} discovered files",
        report.files_completed,
        report.files_discovered
    );
    assert_eq!(
        report.outcomes.total(),
        report.records_harvested,
        "Every harvested record should have exactly one outcome"
    );
    assert_eq!(report.records_submitted, report.outcomes.submitted());
}
