//! Indexing pipeline orchestration.
//!
//! The [`Scheduler`] owns a fixed number of worker slots. Every empty
//! slot receives the next pending [`FileTask`], which is extracted on
//! the blocking pool. The driving task then waits for any slot to
//! complete, harvests its records into the [`Submitter`] and frees the
//! slot. Submission therefore happens on a single task, in harvest
//! order, while extraction runs in parallel.
//!
//! A panic inside an extractor is a per-file failure. A task that
//! cannot be joined, or a backend that can no longer be locked, aborts
//! the run after the in-flight slots have drained.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

use crate::core::error::{MathdexError, Result};
use crate::core::indexer::dispatcher::Extractor;
use crate::core::indexer::record::Record;
use crate::core::indexer::submission::Submitter;
use crate::core::storage::SearchBackend;
use crate::core::types::{FileTask, RunReport};

/// State of one worker slot
#[derive(Debug)]
enum SlotState {
    Empty,
    Running { path: String },
    Completed { path: String, records: Vec<Record> },
}

/// Value returned by a slot's extraction task
struct SlotResult {
    slot: usize,
    path: String,
    outcome: std::thread::Result<Vec<Record>>,
}

/// Counters for one run
#[derive(Debug, Default)]
struct RunCounters {
    completed: usize,
    harvested: usize,
}

/// Bounded-concurrency extraction scheduler
pub struct Scheduler<E: Extractor> {
    extractor: Arc<E>,
    workers: usize,
}

impl<E: Extractor> Scheduler<E> {
    /// Create a scheduler with `workers` slots (at least one)
    pub fn new(extractor: E, workers: usize) -> Self {
        Self::from_shared(Arc::new(extractor), workers)
    }

    pub fn from_shared(extractor: Arc<E>, workers: usize) -> Self {
        Self {
            extractor,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Extract every task and submit the results
    ///
    /// Commits the backend once all files are harvested.
    pub async fn run<B: SearchBackend>(
        &self,
        tasks: Vec<FileTask>,
        submitter: &mut Submitter<B>,
    ) -> Result<RunReport> {
        let start = Instant::now();
        let times_at_start = process_times();
        let formulae_at_start = self.extractor.formulae_seen();
        let total = tasks.len();
        tracing::info!("Indexing {} files with {} workers", total, self.workers);

        let mut pending = tasks.into_iter();
        let mut slots: Vec<SlotState> = (0..self.workers).map(|_| SlotState::Empty).collect();
        let mut running: JoinSet<SlotResult> = JoinSet::new();
        let mut counters = RunCounters::default();

        loop {
            for (slot, state) in slots.iter_mut().enumerate() {
                if !matches!(state, SlotState::Empty) {
                    continue;
                }
                let Some(task) = pending.next() else {
                    break;
                };
                *state = SlotState::Running {
                    path: task.root_relative_path.clone(),
                };
                self.dispatch(&mut running, slot, task);
            }

            let Some(joined) = running.join_next().await else {
                break;
            };

            let fatal = match joined {
                Ok(result) => {
                    let SlotResult {
                        slot,
                        path,
                        outcome,
                    } = result;
                    let records = outcome.unwrap_or_else(|_| {
                        tracing::warn!("Extraction panicked for {}", path);
                        Vec::new()
                    });
                    slots[slot] = SlotState::Completed { path, records };
                    self.harvest(&mut slots[slot], submitter, &mut counters, total)
                        .await
                        .err()
                }
                Err(e) => Some(MathdexError::Scheduler(format!(
                    "Extraction task could not be joined: {e}"
                ))),
            };

            if let Some(e) = fatal {
                tracing::error!("Aborting run: {}", e);
                for state in &slots {
                    if let SlotState::Running { path } = state {
                        tracing::warn!("Waiting for in-flight {}", path);
                    }
                }
                let discarded = Self::drain(&mut running).await;
                tracing::warn!(
                    "Drained {} in-flight files, {} never dispatched",
                    discarded,
                    pending.len()
                );
                return Err(e);
            }
        }

        let outcomes = submitter.flush().await?;
        let formulae = self
            .extractor
            .formulae_seen()
            .saturating_sub(formulae_at_start);

        let elapsed = start.elapsed();
        let (cpu_time, user_time) = match (times_at_start, process_times()) {
            (Some((cpu0, user0)), Some((cpu1, user1))) => (
                Some(cpu1.saturating_sub(cpu0)),
                Some(user1.saturating_sub(user0)),
            ),
            _ => (None, None),
        };

        tracing::info!(
            "Indexing complete: {} files, {} records submitted \
             ({} conflicts, {} failed), {} formulae in {}ms",
            counters.completed,
            outcomes.submitted(),
            outcomes.conflicts,
            outcomes.failed,
            formulae,
            elapsed.as_millis()
        );

        Ok(RunReport {
            files_discovered: total,
            files_completed: counters.completed,
            records_harvested: counters.harvested,
            records_submitted: outcomes.submitted(),
            outcomes,
            formulae,
            elapsed,
            cpu_time,
            user_time,
        })
    }

    fn dispatch(&self, running: &mut JoinSet<SlotResult>, slot: usize, task: FileTask) {
        let extractor = Arc::clone(&self.extractor);
        running.spawn_blocking(move || {
            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| extractor.build_records(&task)));
            SlotResult {
                slot,
                path: task.root_relative_path,
                outcome,
            }
        });
    }

    /// Submit a completed slot's records and free the slot
    async fn harvest<B: SearchBackend>(
        &self,
        state: &mut SlotState,
        submitter: &mut Submitter<B>,
        counters: &mut RunCounters,
        total: usize,
    ) -> Result<()> {
        let SlotState::Completed { path, records } = std::mem::replace(state, SlotState::Empty)
        else {
            return Err(MathdexError::Scheduler(
                "Harvested a slot that was not completed".to_string(),
            ));
        };

        tracing::debug!("Harvested {} ({} records)", path, records.len());
        counters.harvested += records.len();
        submitter.submit_all(records).await?;
        counters.completed += 1;
        tracing::info!("File progress: {}/{} done", counters.completed, total);
        Ok(())
    }

    /// Wait for every in-flight task, discarding results
    async fn drain(running: &mut JoinSet<SlotResult>) -> usize {
        let mut drained = 0;
        while running.join_next().await.is_some() {
            drained += 1;
        }
        drained
    }
}

const CLOCK_TICKS_PER_SEC: u64 = 100;

/// Process CPU time (user + system) and user time
#[cfg(target_os = "linux")]
fn process_times() -> Option<(Duration, Duration)> {
    let stat = std::fs::read_to_string("/proc/self/stat").ok()?;
    // Fields after the parenthesised command name start at `state`
    let (_, rest) = stat.rsplit_once(')')?;
    let fields: Vec<&str> = rest.split_whitespace().collect();
    let utime: u64 = fields.get(11)?.parse().ok()?;
    let stime: u64 = fields.get(12)?.parse().ok()?;

    let ticks = |t: u64| Duration::from_millis(t * 1000 / CLOCK_TICKS_PER_SEC);
    Some((ticks(utime + stime), ticks(utime)))
}

#[cfg(not(target_os = "linux"))]
fn process_times() -> Option<(Duration, Duration)> {
    None
}
