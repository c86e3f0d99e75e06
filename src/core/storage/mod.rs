//! Storage layer: the search backend the indexer submits to.
//!
//! # Architecture
//!
//! - **SearchBackend**: write contract used by submission (one write
//!   per record, keyed by `id`) plus delete-by-path and statistics
//! - **TantivyBackend**: on-disk Tantivy index with the math analyzer
//! - **InMemoryBackend**: map-backed store for tests and dry runs
//!
//! # Index Directory Structure
//!
//! ```text
//! {index_dir}/
//! ├── meta.json           # Tantivy index metadata
//! ├── .managed.json
//! └── [segment files]
//! ```

mod memory;
mod tantivy;

pub use self::memory::{InMemoryBackend, StoredDocument};
pub use self::tantivy::{create_schema, delete_index_dir, TantivyBackend, MATH_ANALYZER};

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::core::error::Result;
use crate::core::indexer::record::Record;
use crate::core::types::{BackendStats, WriteOutcome};

/// Write side of a search index
///
/// `submit` returns `Err` when the backend rejects a record; callers
/// treat that as a [`WriteOutcome::Failed`] for that record only.
pub trait SearchBackend: Send + 'static {
    /// Insert or replace the document identified by the record's `id`
    fn submit(&mut self, record: Record) -> Result<WriteOutcome>;

    /// Submit a batch with per-item outcomes
    ///
    /// A repeated `id` within one batch is a `Conflict` for the later
    /// item. Failures never affect sibling items.
    fn submit_bulk(&mut self, records: Vec<Record>) -> Vec<Result<WriteOutcome>> {
        let mut seen = HashSet::new();
        records
            .into_iter()
            .map(|record| {
                let repeated = record.id().is_some_and(|id| !seen.insert(id.to_string()));
                if repeated {
                    Ok(WriteOutcome::Conflict)
                } else {
                    self.submit(record)
                }
            })
            .collect()
    }

    /// Make submitted documents durable and visible
    fn commit(&mut self) -> Result<()>;

    /// Remove every document whose `path` equals `path`
    ///
    /// Returns the number of removed documents.
    fn delete_by_path(&mut self, path: &str) -> Result<u64>;

    fn stats(&self) -> Result<BackendStats>;
}

/// Calculate directory size recursively
pub(crate) fn calculate_directory_size(path: &Path) -> u64 {
    let mut total = 0;

    if path.is_dir() {
        if let Ok(entries) = fs::read_dir(path) {
            for entry in entries.filter_map(|e| e.ok()) {
                if let Ok(metadata) = entry.metadata() {
                    if metadata.is_dir() {
                        total += calculate_directory_size(&entry.path());
                    } else {
                        total += metadata.len();
                    }
                }
            }
        }
    } else if path.is_file() {
        if let Ok(metadata) = fs::metadata(path) {
            total = metadata.len();
        }
    }

    total
}
