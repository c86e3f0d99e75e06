//! Extension dispatch and archive expansion.
//!
//! A [`Dispatcher`] turns one [`FileTask`] into zero or more records.
//! Zip archives are opened once and every non-directory entry is built
//! as its own document; anything else goes straight to the
//! [`RecordBuilder`]. Per-file and per-entry failures are logged and
//! never escape.
//!
//! Entries are decompressed into memory, so the same size cap that
//! discovery applies to files also bounds each archive entry.

use crate::core::error::{MathdexError, Result};
use crate::core::indexer::builder::RecordBuilder;
use crate::core::indexer::record::Record;
use crate::core::indexer::source::{
    ArchiveEntrySource, ArchiveHandle, DocumentSource, FileSource, ENTRY_MARKER,
};
use crate::core::types::FileTask;

/// Extension that triggers archive expansion
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Entry size cap when none is configured
pub const DEFAULT_MAX_ENTRY_MB: usize = 100;

/// Turns a file task into records
///
/// Implementations run on worker threads and must not fail: any error
/// is logged and yields an empty (or partial) record list.
pub trait Extractor: Send + Sync + 'static {
    fn build_records(&self, task: &FileTask) -> Vec<Record>;

    /// Formulae tokenized so far. Tokens are consumed lazily at
    /// submission, so read this after the backend has seen the records.
    fn formulae_seen(&self) -> u64 {
        0
    }
}

/// Default [`Extractor`]: dispatches on extension, expands zip archives
#[derive(Clone)]
pub struct Dispatcher {
    builder: RecordBuilder,
    max_entry_bytes: u64,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(RecordBuilder::default())
    }
}

impl Dispatcher {
    pub fn new(builder: RecordBuilder) -> Self {
        Self {
            builder,
            max_entry_bytes: mb_to_bytes(DEFAULT_MAX_ENTRY_MB),
        }
    }

    /// Cap the uncompressed size of archive entries, in megabytes
    pub fn with_max_entry_size_mb(self, mb: usize) -> Self {
        self.with_max_entry_bytes(mb_to_bytes(mb))
    }

    pub fn with_max_entry_bytes(mut self, bytes: u64) -> Self {
        self.max_entry_bytes = bytes;
        self
    }

    pub fn max_entry_bytes(&self) -> u64 {
        self.max_entry_bytes
    }

    fn expand_archive(&self, task: &FileTask) -> Result<Vec<Record>> {
        let handle =
            ArchiveHandle::open(&task.absolute_path)?.with_max_entry_bytes(self.max_entry_bytes);
        let entries = handle.entries()?;
        tracing::debug!(
            "Expanding {} ({} entries)",
            task.root_relative_path,
            entries.len()
        );

        let mut records = Vec::new();
        for entry in entries {
            if entry.size > self.max_entry_bytes {
                tracing::debug!(
                    "Skipping large entry: {}{}{} ({} bytes)",
                    task.root_relative_path,
                    ENTRY_MARKER,
                    entry.name,
                    entry.size
                );
                continue;
            }
            let ext = entry_extension(&entry.name);
            let source = DocumentSource::ArchiveEntry(ArchiveEntrySource::new(
                &handle,
                task.root_relative_path.as_str(),
                entry,
            ));
            match self.builder.build(&source, &ext) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => log_failure(&source.identity(), &e),
            }
        }

        // handle drops here, after the last entry source
        Ok(records)
    }

    fn build_file(&self, task: &FileTask) -> Result<Vec<Record>> {
        let source = DocumentSource::File(FileSource::new(
            &task.absolute_path,
            task.root_relative_path.as_str(),
        ));
        Ok(self
            .builder
            .build(&source, &task.extension)?
            .into_iter()
            .collect())
    }
}

impl Extractor for Dispatcher {
    fn build_records(&self, task: &FileTask) -> Vec<Record> {
        let ext = last_extension(&task.extension);
        let result = if ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION) {
            self.expand_archive(task)
        } else {
            self.build_file(task)
        };

        match result {
            Ok(records) => records,
            Err(e) => {
                log_failure(&task.root_relative_path, &e);
                Vec::new()
            }
        }
    }

    fn formulae_seen(&self) -> u64 {
        self.builder.formulae_seen()
    }
}

/// Unreadable input is a warning; anything else points at the indexer
fn log_failure(identity: &str, e: &MathdexError) {
    if e.is_per_file() {
        tracing::warn!("Failed to process {}: {}", identity, e);
    } else {
        tracing::error!("Failed to process {}: {}", identity, e);
    }
}

fn mb_to_bytes(mb: usize) -> u64 {
    (mb as u64).saturating_mul(1024 * 1024)
}

/// Text after the last `.`, or the whole string when there is none
fn last_extension(ext: &str) -> &str {
    ext.rfind('.').map_or(ext, |dot| &ext[dot + 1..])
}

/// Extension of an archive entry name
///
/// The text after the last `.`, cut at the last `#` when that marker
/// comes after the dot (`sec.html#frag2` -> `html`). Names without a
/// dot have no extension.
pub fn entry_extension(name: &str) -> String {
    let Some(dot) = name.rfind('.') else {
        return String::new();
    };
    let end = match name.rfind(ENTRY_MARKER) {
        Some(hash) if hash > dot => hash,
        _ => name.len(),
    };
    name[dot + 1..end].to_ascii_lowercase()
}
