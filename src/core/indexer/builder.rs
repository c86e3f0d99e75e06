//! Record assembly for a single document source.
//!
//! The document kind is chosen from the extension. Markup documents
//! get scraped metadata plus two independent math token streams;
//! plain text documents get their decoded text as `content`.
//! Unknown extensions produce no record.

use std::io::Read;
use std::sync::Arc;

use crate::core::error::{MathdexError, Result};
use crate::core::extract::{
    HtmlScraper, MarkupScraper, MathMlTokenizer, MathMode, MathTokenizer,
};
use crate::core::indexer::record::{fields, FieldValue, Record};
use crate::core::indexer::source::DocumentSource;

/// Kinds of documents the builder understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Markup,
    PlainText,
}

impl DocumentKind {
    /// Select a kind from a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" | "xhtml" | "xml" => Some(DocumentKind::Markup),
            "txt" => Some(DocumentKind::PlainText),
            _ => None,
        }
    }
}

/// Builds field records from document sources
#[derive(Clone)]
pub struct RecordBuilder {
    scraper: Arc<dyn MarkupScraper>,
    tokenizer: Arc<dyn MathTokenizer>,
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new(Arc::new(HtmlScraper::new()), Arc::new(MathMlTokenizer::new()))
    }
}

impl RecordBuilder {
    pub fn new(scraper: Arc<dyn MarkupScraper>, tokenizer: Arc<dyn MathTokenizer>) -> Self {
        Self { scraper, tokenizer }
    }

    /// Formulae the tokenizer has consumed so far
    pub fn formulae_seen(&self) -> u64 {
        self.tokenizer.formulae_seen()
    }

    /// Build the record for `source`, or `None` for unsupported extensions
    pub fn build(&self, source: &DocumentSource<'_>, ext: &str) -> Result<Option<Record>> {
        let Some(kind) = DocumentKind::from_extension(ext) else {
            tracing::debug!("Skipping {} (unsupported extension '{}')", source.identity(), ext);
            return Ok(None);
        };

        let record = match kind {
            DocumentKind::Markup => self.build_markup(source)?,
            DocumentKind::PlainText => self.build_plain_text(source)?,
        };
        Ok(Some(record))
    }

    fn build_markup(&self, source: &DocumentSource<'_>) -> Result<Record> {
        let mut record = source.create_mapping()?;

        let scraped = self.scraper.scrape(source.open_stream()?)?;
        record.insert_non_empty(fields::ID, scraped.external_id);
        record.insert_non_empty(fields::TITLE, scraped.title);
        record.insert_non_empty(fields::AUTHORS, scraped.authors);
        record.insert_non_empty(fields::CONTENT, scraped.body);

        // Each tokenizer drains its own stream
        let pmath = self
            .tokenizer
            .tokenize(source.open_stream()?, MathMode::Presentation);
        record.insert(fields::PRESENTATION_MATH, FieldValue::Tokens(pmath));

        let cmath = self
            .tokenizer
            .tokenize(source.open_stream()?, MathMode::Content);
        record.insert(fields::CONTENT_MATH, FieldValue::Tokens(cmath));

        Ok(record)
    }

    fn build_plain_text(&self, source: &DocumentSource<'_>) -> Result<Record> {
        let mut record = source.create_mapping()?;

        let mut bytes = Vec::new();
        source.open_stream()?.read_to_end(&mut bytes).map_err(|e| {
            MathdexError::ExtractionFailed(format!("Failed to read {}: {e}", source.identity()))
        })?;
        let text = String::from_utf8_lossy(&bytes).into_owned();
        record.insert_non_empty(fields::CONTENT, Some(text));

        Ok(record)
    }
}
