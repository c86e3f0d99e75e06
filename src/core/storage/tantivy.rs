//! Tantivy-backed search index.
//!
//! This module wraps Tantivy operations for creating, writing to and
//! maintaining the on-disk document index. Math token fields use a
//! registered whitespace analyzer and receive their values as
//! pre-tokenized streams.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tantivy::collector::Count;
use tantivy::indexer::NoMergePolicy;
use tantivy::query::TermQuery;
use tantivy::schema::{
    Field, FieldType, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, FAST, INDEXED,
    STORED, STRING, TEXT,
};
use tantivy::tokenizer::{PreTokenizedString, TextAnalyzer, Token, WhitespaceTokenizer};
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};

use super::{calculate_directory_size, SearchBackend};
use crate::core::error::{MathdexError, Result};
use crate::core::indexer::record::{fields, FieldValue, Record, TokenStream};
use crate::core::types::{BackendStats, WriteOutcome};

/// Name of the analyzer bound to the math token fields
pub const MATH_ANALYZER: &str = "math";

/// Writer heap size in bytes
const WRITER_HEAP_BYTES: usize = 50_000_000;

/// Create the Tantivy schema for document records
///
/// Fields:
/// - id, path, archivepath: raw keywords (STRING | STORED)
/// - title, authors: full text (TEXT | STORED)
/// - content: full text (TEXT)
/// - modified: date (INDEXED | STORED)
/// - filesize: u64 (INDEXED | STORED | FAST)
/// - pmath, cmath: math tokens (math analyzer, positions)
pub fn create_schema() -> Schema {
    let mut builder = Schema::builder();

    // Identity and location
    builder.add_text_field(fields::ID, STRING | STORED);
    builder.add_text_field(fields::PATH, STRING | STORED);
    builder.add_text_field(fields::ARCHIVE_PATH, STRING | STORED);

    // Descriptive text
    builder.add_text_field(fields::TITLE, TEXT | STORED);
    builder.add_text_field(fields::AUTHORS, TEXT | STORED);
    builder.add_text_field(fields::CONTENT, TEXT);

    builder.add_date_field(fields::MODIFIED, INDEXED | STORED);
    builder.add_u64_field(fields::FILESIZE, INDEXED | STORED | FAST);

    let math = TextOptions::default().set_indexing_options(
        TextFieldIndexing::default()
            .set_tokenizer(MATH_ANALYZER)
            .set_index_option(IndexRecordOption::WithFreqsAndPositions),
    );
    builder.add_text_field(fields::PRESENTATION_MATH, math.clone());
    builder.add_text_field(fields::CONTENT_MATH, math);

    builder.build()
}

fn register_analyzers(index: &Index) {
    index.tokenizers().register(
        MATH_ANALYZER,
        TextAnalyzer::builder(WhitespaceTokenizer::default()).build(),
    );
}

/// Recursively delete an index directory
///
/// Returns `false` (with a warning) when there was nothing to delete.
pub fn delete_index_dir(index_dir: &Path) -> Result<bool> {
    if !index_dir.exists() {
        tracing::warn!("Index directory {:?} does not exist, nothing to delete", index_dir);
        return Ok(false);
    }
    fs::remove_dir_all(index_dir)?;
    tracing::info!("Deleted index directory {:?}", index_dir);
    Ok(true)
}

/// On-disk search backend
pub struct TantivyBackend {
    /// Tantivy index instance
    index: Index,

    /// Schema definition
    schema: Schema,

    /// Index writer (for adding and deleting documents)
    writer: IndexWriter,

    /// Reader over the last commit
    reader: IndexReader,

    /// Ids written since the last commit
    pending_ids: HashSet<String>,

    index_dir: PathBuf,
    id_field: Field,
    path_field: Field,
}

impl std::fmt::Debug for TantivyBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TantivyBackend")
            .field("index_dir", &self.index_dir)
            .field("pending", &self.pending_ids.len())
            .finish()
    }
}

impl TantivyBackend {
    /// Create a fresh index, replacing any existing one at `index_dir`
    pub fn create(index_dir: &Path) -> Result<Self> {
        if index_dir.exists() {
            tracing::info!("Replacing existing index at {:?}", index_dir);
            fs::remove_dir_all(index_dir)?;
        }
        fs::create_dir_all(index_dir)?;

        let index = Index::create_in_dir(index_dir, create_schema())
            .map_err(|e| MathdexError::Backend(format!("Failed to create index: {e}")))?;
        Self::from_index(index, index_dir)
    }

    /// Open an existing index
    pub fn open(index_dir: &Path) -> Result<Self> {
        let index = Index::open_in_dir(index_dir)
            .map_err(|e| MathdexError::Backend(format!("Failed to open index: {e}")))?;
        Self::from_index(index, index_dir)
    }

    /// Open the index at `index_dir`, creating it when absent
    pub fn open_or_create(index_dir: &Path) -> Result<Self> {
        if index_dir.join("meta.json").exists() {
            Self::open(index_dir)
        } else {
            Self::create(index_dir)
        }
    }

    fn from_index(index: Index, index_dir: &Path) -> Result<Self> {
        register_analyzers(&index);
        let schema = index.schema();

        let id_field = schema
            .get_field(fields::ID)
            .map_err(|e| MathdexError::Backend(format!("Missing id field: {e}")))?;
        let path_field = schema
            .get_field(fields::PATH)
            .map_err(|e| MathdexError::Backend(format!("Missing path field: {e}")))?;

        let writer = index
            .writer(WRITER_HEAP_BYTES)
            .map_err(|e| MathdexError::Backend(format!("Failed to create writer: {e}")))?;
        // Segments are only merged by `optimize`
        writer.set_merge_policy(Box::new(NoMergePolicy));

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| MathdexError::Backend(format!("Failed to create reader: {e}")))?;

        Ok(Self {
            index,
            schema,
            writer,
            reader,
            pending_ids: HashSet::new(),
            index_dir: index_dir.to_path_buf(),
            id_field,
            path_field,
        })
    }

    /// Number of committed documents with `value` in keyword field `field`
    pub fn count_matching(&self, field: &str, value: &str) -> Result<u64> {
        let field = self
            .schema
            .get_field(field)
            .map_err(|e| MathdexError::Backend(format!("Unknown field: {e}")))?;
        self.count_term(Term::from_field_text(field, value))
    }

    fn count_term(&self, term: Term) -> Result<u64> {
        let query = TermQuery::new(term, IndexRecordOption::Basic);
        let count = self.reader.searcher().search(&query, &Count)?;
        Ok(count as u64)
    }

    /// Merge all searchable segments into one
    pub fn optimize(&mut self) -> Result<()> {
        self.commit()?;
        let segment_ids = self.index.searchable_segment_ids()?;
        if segment_ids.len() > 1 {
            tracing::info!("Merging {} segments", segment_ids.len());
            self.writer
                .merge(&segment_ids)
                .wait()
                .map_err(|e| MathdexError::Backend(format!("Failed to merge segments: {e}")))?;
        }
        self.writer
            .garbage_collect_files()
            .wait()
            .map_err(|e| MathdexError::Backend(format!("Failed to collect garbage: {e}")))?;
        self.reader.reload()?;
        Ok(())
    }

    /// Number of searchable segments
    pub fn segment_count(&self) -> Result<usize> {
        Ok(self.index.searchable_segment_ids()?.len())
    }

    pub fn index_dir(&self) -> &Path {
        &self.index_dir
    }

    /// Get the schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    fn to_document(&self, record: Record) -> Result<(String, TantivyDocument)> {
        let id = record
            .id()
            .map(str::to_string)
            .ok_or_else(|| MathdexError::Backend("Record has no id".to_string()))?;

        let mut doc = TantivyDocument::default();
        for (name, value) in record.into_fields() {
            let Ok(field) = self.schema.get_field(&name) else {
                tracing::trace!("Ignoring unknown field '{}'", name);
                continue;
            };
            match (self.schema.get_field_entry(field).field_type(), value) {
                (FieldType::Str(_), FieldValue::Text(s)) => doc.add_text(field, s),
                (FieldType::Str(_), FieldValue::Tokens(tokens)) => {
                    doc.add_pre_tokenized_text(field, pre_tokenize(tokens))
                }
                (FieldType::U64(_), FieldValue::U64(n)) => doc.add_u64(field, n),
                (FieldType::Date(_), FieldValue::Date(d)) => {
                    doc.add_date(field, tantivy::DateTime::from_timestamp_secs(d.timestamp()))
                }
                (_, value) => {
                    return Err(MathdexError::Backend(format!(
                        "Field '{name}' of {id} cannot hold {value:?}"
                    )))
                }
            }
        }
        Ok((id, doc))
    }
}

/// Lay tokens out space-separated with one position per token
fn pre_tokenize(tokens: TokenStream) -> PreTokenizedString {
    let mut text = String::new();
    let mut out = Vec::new();
    for (position, token) in tokens.enumerate() {
        if !text.is_empty() {
            text.push(' ');
        }
        let offset_from = text.len();
        text.push_str(&token);
        out.push(Token {
            offset_from,
            offset_to: text.len(),
            position,
            text: token,
            position_length: 1,
        });
    }
    PreTokenizedString { text, tokens: out }
}

impl SearchBackend for TantivyBackend {
    fn submit(&mut self, record: Record) -> Result<WriteOutcome> {
        let (id, doc) = self.to_document(record)?;
        let id_term = Term::from_field_text(self.id_field, &id);

        let exists = self.pending_ids.contains(&id) || self.count_term(id_term.clone())? > 0;
        self.writer.delete_term(id_term);
        self.writer
            .add_document(doc)
            .map_err(|e| MathdexError::Backend(format!("Failed to add document {id}: {e}")))?;
        self.pending_ids.insert(id);

        Ok(if exists {
            WriteOutcome::Updated
        } else {
            WriteOutcome::Created
        })
    }

    /// Commit changes to disk
    fn commit(&mut self) -> Result<()> {
        self.writer
            .commit()
            .map_err(|e| MathdexError::Backend(format!("Failed to commit: {e}")))?;
        self.reader.reload()?;
        self.pending_ids.clear();
        Ok(())
    }

    fn delete_by_path(&mut self, path: &str) -> Result<u64> {
        self.commit()?;
        let term = Term::from_field_text(self.path_field, path);
        let removed = self.count_term(term.clone())?;
        self.writer.delete_term(term);
        self.commit()?;
        tracing::info!("Deleted {} documents with path {}", removed, path);
        Ok(removed)
    }

    fn stats(&self) -> Result<BackendStats> {
        self.reader.reload()?;
        let searcher = self.reader.searcher();

        let mut indexed_bytes = 0;
        for segment_reader in searcher.segment_readers() {
            let column = segment_reader.fast_fields().u64(fields::FILESIZE)?;
            for doc in segment_reader.doc_ids_alive() {
                if let Some(size) = column.first(doc) {
                    indexed_bytes += size;
                }
            }
        }

        Ok(BackendStats {
            documents: searcher.num_docs(),
            indexed_bytes,
            storage_bytes: calculate_directory_size(&self.index_dir),
            index_dir: Some(self.index_dir.clone()),
        })
    }
}
