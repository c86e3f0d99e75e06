//! mathdex - math-aware document indexer
//!
//! Walks a corpus of HTML/XML documents (and zip archives of them),
//! extracts title, authors, body text and MathML formula tokens from
//! each document, and writes one record per document into a Tantivy
//! index.
//!
//! # Architecture
//!
//! - **core**: Domain logic
//!   - config, error, types, xdg
//!   - extract (markup scraping, math tokenization)
//!   - indexer (discovery, document sources, record building,
//!     dispatch, scheduling, submission)
//!   - storage (search backends: Tantivy, in-memory)
//!   - services (index lifecycle operations)
//!
//! - **cli**: clap adapter over `core`
//!
//! # Pipeline
//!
//! ```text
//! Discovery -> FileTask -> Scheduler (N workers) -> Dispatcher
//!           -> RecordBuilder -> Record -> Submitter -> SearchBackend
//! ```

// Core domain logic
pub mod core;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{MathdexError, Result};
pub use core::services::Services;
pub use core::types::*;
