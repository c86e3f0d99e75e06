//! Core data types for the mathdex indexer.
//!
//! This module defines the data structures passed between the
//! discovery, extraction, submission and reporting stages.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// One discovered input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTask {
    /// Canonical absolute path of the file
    pub absolute_path: PathBuf,

    /// Absolute path with the storage root prefix removed
    pub root_relative_path: String,

    /// Lowercased text after the last `.` of the file name
    pub extension: String,
}

/// Result of a single backend write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteOutcome {
    Created,
    Updated,
    Conflict,
    Failed,
}

impl WriteOutcome {
    /// Whether the record landed in the index
    pub fn is_success(&self) -> bool {
        matches!(self, WriteOutcome::Created | WriteOutcome::Updated)
    }
}

/// Running totals of submission outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitTally {
    pub created: usize,
    pub updated: usize,
    pub conflicts: usize,
    pub failed: usize,
}

impl SubmitTally {
    /// Count one outcome
    pub fn record(&mut self, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Created => self.created += 1,
            WriteOutcome::Updated => self.updated += 1,
            WriteOutcome::Conflict => self.conflicts += 1,
            WriteOutcome::Failed => self.failed += 1,
        }
    }

    /// Records that were written (created or updated)
    pub fn submitted(&self) -> usize {
        self.created + self.updated
    }

    /// All outcomes seen so far
    pub fn total(&self) -> usize {
        self.created + self.updated + self.conflicts + self.failed
    }
}

/// Statistics from an indexing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Number of files returned by discovery (after the limit)
    pub files_discovered: usize,

    /// Number of files whose extraction result was harvested
    pub files_completed: usize,

    /// Records produced by extraction and handed to submission
    pub records_harvested: usize,

    /// Records written to the backend (created or updated)
    pub records_submitted: usize,

    /// Submission outcome breakdown
    pub outcomes: SubmitTally,

    /// Math formulae tokenized into submitted records
    pub formulae: u64,

    /// Wall-clock duration of the run
    pub elapsed: Duration,

    /// Process CPU time (user + system) consumed during the run
    pub cpu_time: Option<Duration>,

    /// Process user time consumed during the run
    pub user_time: Option<Duration>,
}

/// Backend-level index statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendStats {
    /// Number of live documents
    pub documents: u64,

    /// Sum of the `filesize` field across documents
    pub indexed_bytes: u64,

    /// On-disk footprint of the index
    pub storage_bytes: u64,

    /// Index location, when the backend is disk-based
    pub index_dir: Option<PathBuf>,
}
