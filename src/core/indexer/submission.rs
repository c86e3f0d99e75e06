//! Record submission to the search backend.
//!
//! The [`Submitter`] turns harvested records into backend writes and
//! tallies their outcomes. A rejected or conflicting record is logged
//! and counted; it never stops the records after it.
//!
//! Three modes are supported:
//!
//! - `sync`: one write per record, on the calling task
//! - `async`: each write runs on the blocking pool; finished writes are
//!   reaped as new ones are dispatched and drained by [`Submitter::flush`]
//! - `bulk`: all records of one file go to the backend as one batch

use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::{JoinError, JoinSet};

use crate::core::config::SubmitMode;
use crate::core::error::{MathdexError, Result};
use crate::core::indexer::record::Record;
use crate::core::storage::SearchBackend;
use crate::core::types::{SubmitTally, WriteOutcome};

/// Upper bound on concurrently running async writes
const MAX_IN_FLIGHT: usize = 64;

type WriteResult = (String, Result<WriteOutcome>);

/// Submits records and tracks outcomes
pub struct Submitter<B: SearchBackend> {
    backend: Arc<Mutex<B>>,
    mode: SubmitMode,
    in_flight: JoinSet<WriteResult>,
    tally: SubmitTally,
}

impl<B: SearchBackend> Submitter<B> {
    pub fn new(backend: B, mode: SubmitMode) -> Self {
        Self::from_shared(Arc::new(Mutex::new(backend)), mode)
    }

    pub fn from_shared(backend: Arc<Mutex<B>>, mode: SubmitMode) -> Self {
        Self {
            backend,
            mode,
            in_flight: JoinSet::new(),
            tally: SubmitTally::default(),
        }
    }

    /// Shared handle to the backend
    pub fn backend(&self) -> Arc<Mutex<B>> {
        Arc::clone(&self.backend)
    }

    pub fn mode(&self) -> SubmitMode {
        self.mode
    }

    /// Outcomes observed so far (async writes count once reaped)
    pub fn tally(&self) -> SubmitTally {
        self.tally
    }

    /// Submit the records harvested from one file
    pub async fn submit_all(&mut self, records: Vec<Record>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        match self.mode {
            SubmitMode::Sync => {
                for record in records {
                    let id = record_label(&record);
                    let result = lock(&self.backend)?.submit(record);
                    self.observe(&id, result);
                }
            }
            SubmitMode::Async => {
                for record in records {
                    while self.in_flight.len() >= MAX_IN_FLIGHT {
                        if let Some(joined) = self.in_flight.join_next().await {
                            self.observe_joined(joined);
                        }
                    }
                    let backend = Arc::clone(&self.backend);
                    self.in_flight.spawn_blocking(move || {
                        let id = record_label(&record);
                        let result = lock(&backend).and_then(|mut b| b.submit(record));
                        (id, result)
                    });
                }
                while let Some(joined) = self.in_flight.try_join_next() {
                    self.observe_joined(joined);
                }
            }
            SubmitMode::Bulk => {
                let ids: Vec<String> = records.iter().map(record_label).collect();
                let results = lock(&self.backend)?.submit_bulk(records);
                for (id, result) in ids.iter().zip(results) {
                    self.observe(id, result);
                }
            }
        }

        Ok(())
    }

    /// Wait for outstanding writes, then commit the backend
    pub async fn flush(&mut self) -> Result<SubmitTally> {
        while let Some(joined) = self.in_flight.join_next().await {
            self.observe_joined(joined);
        }
        lock(&self.backend)?.commit()?;
        tracing::debug!("Committed backend ({} outcomes)", self.tally.total());
        Ok(self.tally)
    }

    fn observe_joined(&mut self, joined: std::result::Result<WriteResult, JoinError>) {
        match joined {
            Ok((id, result)) => self.observe(&id, result),
            Err(e) => {
                tracing::warn!("Submission task failed: {}", e);
                self.tally.record(WriteOutcome::Failed);
            }
        }
    }

    fn observe(&mut self, id: &str, result: Result<WriteOutcome>) {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("Failed to submit {}: {}", id, e);
                WriteOutcome::Failed
            }
        };
        match outcome {
            WriteOutcome::Created | WriteOutcome::Updated => {
                tracing::debug!("Submitted {} ({:?})", id, outcome)
            }
            WriteOutcome::Conflict => tracing::warn!("Conflict submitting {}", id),
            WriteOutcome::Failed => {}
        }
        self.tally.record(outcome);
    }
}

fn record_label(record: &Record) -> String {
    record
        .id()
        .or_else(|| record.path())
        .unwrap_or("<no id>")
        .to_string()
}

fn lock<B>(backend: &Mutex<B>) -> Result<MutexGuard<'_, B>> {
    backend
        .lock()
        .map_err(|_| MathdexError::Backend("Backend lock poisoned".to_string()))
}
