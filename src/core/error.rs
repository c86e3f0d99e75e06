//! Error types and error handling for the mathdex indexer.
//!
//! This module defines the error type used throughout the
//! application. Errors are split into fatal ones (which abort an
//! indexing run) and per-file / per-record ones (which are logged
//! and skipped by the pipeline).

use thiserror::Error;

/// Result type alias for mathdex operations
pub type Result<T> = std::result::Result<T, MathdexError>;

/// Main error type for the indexer
#[derive(Error, Debug)]
pub enum MathdexError {
    #[error("Path error: {0}")]
    PathError(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Scheduler error: {0}")]
    Scheduler(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl From<tantivy::TantivyError> for MathdexError {
    fn from(e: tantivy::TantivyError) -> Self {
        MathdexError::Backend(e.to_string())
    }
}

impl MathdexError {
    /// Check if this error must abort the whole indexing run
    ///
    /// The CLI adds a note that nothing was committed.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MathdexError::PathError(_) | MathdexError::Scheduler(_) | MathdexError::ConfigError(_)
        )
    }

    /// Check if this error is scoped to a single input file
    ///
    /// Such failures are logged as warnings; others as errors.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            MathdexError::ExtractionFailed(_) | MathdexError::Archive(_) | MathdexError::IoError(_)
        )
    }
}
