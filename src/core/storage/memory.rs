//! In-memory [`SearchBackend`] for tests and dry runs.
//!
//! Documents live in a `HashMap` keyed by `id`. Token streams are
//! drained at submit time, the same point the on-disk backend reads
//! them. Specific ids can be configured to report a conflict or to
//! fail, to exercise per-record failure handling.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::SearchBackend;
use crate::core::error::{MathdexError, Result};
use crate::core::indexer::record::{fields, FieldValue, Record};
use crate::core::types::{BackendStats, WriteOutcome};

/// A document as held by [`InMemoryBackend`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredDocument {
    pub text: BTreeMap<String, String>,
    pub numbers: BTreeMap<String, u64>,
    pub tokens: BTreeMap<String, Vec<String>>,
}

impl StoredDocument {
    fn from_record(record: Record) -> Self {
        let mut doc = StoredDocument::default();
        for (name, value) in record.into_fields() {
            match value {
                FieldValue::Text(s) => {
                    doc.text.insert(name, s);
                }
                FieldValue::U64(n) => {
                    doc.numbers.insert(name, n);
                }
                FieldValue::Date(d) => {
                    doc.text.insert(name, d.to_rfc3339());
                }
                FieldValue::Tokens(tokens) => {
                    doc.tokens.insert(name, tokens.collect());
                }
            }
        }
        doc
    }

    pub fn path(&self) -> Option<&str> {
        self.text.get(fields::PATH).map(String::as_str)
    }

    fn approximate_size(&self) -> u64 {
        let text: usize = self.text.iter().map(|(k, v)| k.len() + v.len()).sum();
        let tokens: usize = self
            .tokens
            .iter()
            .map(|(k, v)| k.len() + v.iter().map(String::len).sum::<usize>())
            .sum();
        (text + tokens + self.numbers.len() * 8) as u64
    }
}

/// Map-backed search backend
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    docs: HashMap<String, StoredDocument>,
    conflict_ids: HashSet<String>,
    failing_ids: HashSet<String>,
    commits: usize,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `Conflict` whenever a record with one of these ids is submitted
    pub fn with_conflicts<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conflict_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Reject records with one of these ids
    pub fn with_failures<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failing_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn get(&self, id: &str) -> Option<&StoredDocument> {
        self.docs.get(id)
    }

    /// Stored ids, sorted
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.docs.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Number of commits observed
    pub fn commits(&self) -> usize {
        self.commits
    }
}

impl SearchBackend for InMemoryBackend {
    fn submit(&mut self, record: Record) -> Result<WriteOutcome> {
        let id = record
            .id()
            .map(str::to_string)
            .ok_or_else(|| MathdexError::Backend("Record has no id".to_string()))?;

        if self.failing_ids.contains(&id) {
            return Err(MathdexError::Backend(format!("Rejected document {id}")));
        }
        if self.conflict_ids.contains(&id) {
            return Ok(WriteOutcome::Conflict);
        }

        let doc = StoredDocument::from_record(record);
        match self.docs.insert(id, doc) {
            Some(_) => Ok(WriteOutcome::Updated),
            None => Ok(WriteOutcome::Created),
        }
    }

    fn commit(&mut self) -> Result<()> {
        self.commits += 1;
        Ok(())
    }

    fn delete_by_path(&mut self, path: &str) -> Result<u64> {
        let before = self.docs.len();
        self.docs.retain(|_, doc| doc.path() != Some(path));
        Ok((before - self.docs.len()) as u64)
    }

    fn stats(&self) -> Result<BackendStats> {
        Ok(BackendStats {
            documents: self.docs.len() as u64,
            indexed_bytes: self
                .docs
                .values()
                .filter_map(|d| d.numbers.get(fields::FILESIZE))
                .sum(),
            storage_bytes: self.docs.values().map(StoredDocument::approximate_size).sum(),
            index_dir: None,
        })
    }
}
