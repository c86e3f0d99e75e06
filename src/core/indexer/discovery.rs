//! Document discovery.
//!
//! Walks a directory tree in a fixed order (pre-order, siblings sorted
//! by file name, symlinks not followed) and turns every regular file
//! into a [`FileTask`]. Unreadable entries are skipped with a warning;
//! a missing root or a file outside the storage root aborts the walk.

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::error::{MathdexError, Result};
use crate::core::types::FileTask;

/// Collects indexable files below a root directory
pub struct Discovery {
    /// Canonical prefix stripped from every discovered path
    storage_root: PathBuf,

    /// Maximum number of files to return (`None` = unlimited)
    limit: Option<usize>,

    /// Maximum file size in bytes (skip larger files)
    max_file_size_bytes: u64,
}

impl Discovery {
    /// Create a new discovery walker
    ///
    /// # Arguments
    ///
    /// * `storage_root` - Prefix removed from canonical file paths
    /// * `limit` - Stop after this many files (`None` = unlimited)
    /// * `max_file_size_mb` - Maximum file size in megabytes
    ///
    /// # Errors
    ///
    /// `PathError` if the storage root cannot be canonicalized
    pub fn new(storage_root: &Path, limit: Option<usize>, max_file_size_mb: usize) -> Result<Self> {
        let storage_root = fs::canonicalize(storage_root).map_err(|e| {
            MathdexError::PathError(format!("Invalid storage root {storage_root:?}: {e}"))
        })?;

        Ok(Self {
            storage_root,
            limit,
            max_file_size_bytes: (max_file_size_mb as u64) * 1024 * 1024,
        })
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    /// Walk `root` and return the discovered files in traversal order
    pub fn discover(&self, root: &Path) -> Result<Vec<FileTask>> {
        let metadata = fs::metadata(root).map_err(|e| {
            MathdexError::PathError(format!("Cannot read discovery root {root:?}: {e}"))
        })?;
        if metadata.is_dir() {
            fs::read_dir(root).map_err(|e| {
                MathdexError::PathError(format!("Cannot list discovery root {root:?}: {e}"))
            })?;
        }

        let mut tasks = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
        {
            if self.limit.is_some_and(|limit| tasks.len() >= limit) {
                tracing::debug!("Document limit reached ({} files)", tasks.len());
                break;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            match entry.metadata() {
                Ok(metadata) if metadata.len() > self.max_file_size_bytes => {
                    tracing::debug!("Skipping large file: {:?} ({} bytes)", path, metadata.len());
                    continue;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Cannot stat {:?}: {}", path, e);
                    continue;
                }
            }

            let absolute_path = match fs::canonicalize(path) {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!("Cannot resolve {:?}: {}", path, e);
                    continue;
                }
            };

            tasks.push(self.task_for(absolute_path)?);
        }

        tracing::info!("Discovered {} files under {:?}", tasks.len(), root);
        Ok(tasks)
    }

    /// Build the task for a canonical path, checking the storage root
    pub fn task_for(&self, absolute_path: PathBuf) -> Result<FileTask> {
        let root_relative_path = absolute_path
            .strip_prefix(&self.storage_root)
            .map_err(|_| {
                MathdexError::PathError(format!(
                    "{:?} is outside the storage root {:?}",
                    absolute_path, self.storage_root
                ))
            })?
            .to_string_lossy()
            .into_owned();
        let extension = extension_of(&absolute_path);

        Ok(FileTask {
            absolute_path,
            root_relative_path,
            extension,
        })
    }
}

/// Lowercased text after the last `.` of the file name
pub fn extension_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .and_then(|name| name.rfind('.').map(|dot| name[dot + 1..].to_ascii_lowercase()))
        .unwrap_or_default()
}
