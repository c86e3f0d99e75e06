//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a specific CLI command.

pub mod completions;
pub mod config;
pub mod delete;
pub mod delete_index;
pub mod index;
pub mod optimize;
pub mod stats;

// Re-export argument types for use in mod.rs
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
pub use delete::DeleteArgs;
pub use delete_index::DeleteIndexArgs;
pub use index::IndexArgs;
pub use optimize::OptimizeArgs;
pub use stats::StatsArgs;
