//! Unified service container for mathdex
//!
//! Wires configuration, discovery, extraction, scheduling and the
//! search backend together for the CLI.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::config::Config;
use crate::core::error::{MathdexError, Result};
use crate::core::indexer::{Discovery, Dispatcher, Scheduler, Submitter};
use crate::core::storage::{self, SearchBackend, TantivyBackend};
use crate::core::types::{BackendStats, RunReport};

/// Unified services container
#[derive(Clone)]
pub struct Services {
    /// Application configuration
    pub config: Arc<Config>,

    /// Extractor shared by all worker slots
    pub dispatcher: Arc<Dispatcher>,
}

impl Services {
    /// Create services from configuration
    pub fn new(config: Config) -> Self {
        let dispatcher =
            Dispatcher::default().with_max_entry_size_mb(config.indexing.max_file_size_mb);
        Self {
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub fn index_dir(&self) -> &Path {
        &self.config.storage.index_dir
    }

    /// Storage root for `path`: explicit, configured, or derived from `path`
    pub fn storage_root_for(&self, path: &Path, explicit: Option<&Path>) -> PathBuf {
        if let Some(root) = explicit.or(self.config.storage.storage_root.as_deref()) {
            return root.to_path_buf();
        }
        if path.is_file() {
            path.parent().map(Path::to_path_buf).unwrap_or_default()
        } else {
            path.to_path_buf()
        }
    }

    /// Discovery configured from the indexing settings
    pub fn discovery(&self, storage_root: &Path) -> Result<Discovery> {
        Discovery::new(
            storage_root,
            self.config.indexing.limit(),
            self.config.indexing.max_file_size_mb,
        )
    }

    /// Discover, extract and submit everything below `path`
    pub async fn run_pipeline<B: SearchBackend>(
        &self,
        path: &Path,
        storage_root: Option<&Path>,
        submitter: &mut Submitter<B>,
    ) -> Result<RunReport> {
        let root = self.storage_root_for(path, storage_root);
        let tasks = self.discovery(&root)?.discover(path)?;

        let scheduler =
            Scheduler::from_shared(Arc::clone(&self.dispatcher), self.config.indexing.threads);
        scheduler.run(tasks, submitter).await
    }

    /// Index `path` into the on-disk index
    ///
    /// With `overwrite` the index is recreated first; otherwise
    /// documents are upserted into the existing index.
    pub async fn index_path(
        &self,
        path: &Path,
        storage_root: Option<&Path>,
        overwrite: bool,
    ) -> Result<RunReport> {
        let backend = if overwrite {
            TantivyBackend::create(self.index_dir())?
        } else {
            TantivyBackend::open_or_create(self.index_dir())?
        };
        let mut submitter = Submitter::new(backend, self.config.indexing.submit_mode);
        self.run_pipeline(path, storage_root, &mut submitter).await
    }

    /// Delete every record originating from files below `path`
    ///
    /// When `path` does not exist on disk it is taken as a literal
    /// root-relative path.
    pub fn delete_path(&self, path: &Path, storage_root: Option<&Path>) -> Result<u64> {
        let mut backend = TantivyBackend::open(self.index_dir())?;
        delete_matching(&mut backend, self, path, storage_root)
    }

    /// Recreate an empty index
    pub fn create_index(&self) -> Result<()> {
        let mut backend = TantivyBackend::create(self.index_dir())?;
        backend.commit()
    }

    /// Remove the index directory; absence is not an error
    pub fn delete_index(&self) -> Result<bool> {
        storage::delete_index_dir(self.index_dir())
    }

    pub fn stats(&self) -> Result<BackendStats> {
        TantivyBackend::open(self.index_dir())?.stats()
    }

    /// Merge the index into a single segment
    pub fn optimize(&self) -> Result<BackendStats> {
        let mut backend = TantivyBackend::open(self.index_dir())?;
        backend.optimize()?;
        backend.stats()
    }
}

/// Delete by path against any backend
pub fn delete_matching<B: SearchBackend>(
    backend: &mut B,
    services: &Services,
    path: &Path,
    storage_root: Option<&Path>,
) -> Result<u64> {
    if !path.exists() {
        let literal = path.to_str().ok_or_else(|| {
            MathdexError::PathError(format!("Path is not valid UTF-8: {path:?}"))
        })?;
        return backend.delete_by_path(literal);
    }

    let root = services.storage_root_for(path, storage_root);
    let discovery = Discovery::new(&root, None, services.config.indexing.max_file_size_mb)?;

    let mut removed = 0;
    for task in discovery.discover(path)? {
        removed += backend.delete_by_path(&task.root_relative_path)?;
    }
    backend.commit()?;
    Ok(removed)
}
