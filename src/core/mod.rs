//! Core domain logic (interface-agnostic)
//!
//! This module contains all indexing logic that is independent of
//! the command-line front end.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **xdg**: XDG directory handling
//! - **extract**: Markup scraping and math tokenization
//! - **indexer**: Discovery, extraction and submission pipeline
//! - **storage**: Search backends (Tantivy, in-memory)
//! - **services**: Unified service container

pub mod config;
pub mod error;
pub mod extract;
pub mod indexer;
pub mod services;
pub mod storage;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{MathdexError, Result};
pub use services::Services;
