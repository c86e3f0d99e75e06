//! Document indexing pipeline.
//!
//! Turns a directory tree into backend writes. Stages, leaf first:
//!
//! - **discovery**: ordered, limited walk producing file tasks
//! - **source**: plain file or zip entry with restartable reads
//! - **record**: field records with lazy math token streams
//! - **builder**: per-document record assembly by extension
//! - **dispatcher**: extension dispatch and archive expansion
//! - **submission**: backend writes and outcome tallies
//! - **scheduler**: bounded worker slots, harvest-then-submit
//!
//! # Failure isolation
//!
//! Extraction failures stay inside the file that caused them and
//! submission failures stay inside the record. Only a missing root,
//! a path outside the storage root or a broken executor ends a run.

pub mod builder;
pub mod discovery;
pub mod dispatcher;
pub mod record;
pub mod scheduler;
pub mod source;
pub mod submission;

pub use builder::{DocumentKind, RecordBuilder};
pub use discovery::Discovery;
pub use dispatcher::{entry_extension, Dispatcher, Extractor};
pub use record::{FieldValue, Record, TokenStream};
pub use scheduler::Scheduler;
pub use source::{ArchiveEntrySource, ArchiveHandle, DocumentSource, FileSource};
pub use submission::Submitter;
