//! Content extraction collaborators.
//!
//! The record builder depends on two pluggable collaborators:
//!
//! - [`MarkupScraper`]: pulls title, authors, body text and an
//!   optional external identifier out of a markup document
//! - [`MathTokenizer`]: turns the math markup embedded in a document
//!   into a lazy stream of search tokens
//!
//! Default implementations are [`HtmlScraper`] and
//! [`MathMlTokenizer`].

pub mod markup;
pub mod math;

pub use self::markup::HtmlScraper;
pub use self::math::{MathMlTokenizer, MathMode};

use crate::core::error::Result;
use crate::core::indexer::record::TokenStream;
use crate::core::indexer::source::DocStream;

/// Metadata scraped from a markup document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedMetadata {
    /// Content-derived identifier (e.g. an arXiv id)
    pub external_id: Option<String>,
    pub title: Option<String>,
    pub authors: Option<String>,
    pub body: Option<String>,
}

/// Extracts descriptive metadata from markup
pub trait MarkupScraper: Send + Sync {
    fn scrape(&self, stream: DocStream) -> Result<ScrapedMetadata>;
}

/// Converts embedded math markup into search tokens
///
/// The returned stream consumes `stream` as it is iterated and cannot
/// be restarted.
pub trait MathTokenizer: Send + Sync {
    fn tokenize(&self, stream: DocStream, mode: MathMode) -> TokenStream;

    /// Formulae tokenized so far, for run reporting
    fn formulae_seen(&self) -> u64 {
        0
    }
}
