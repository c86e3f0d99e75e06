//! Configuration management for the mathdex indexer.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{MathdexError, Result};
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// How harvested records are written to the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitMode {
    /// One blocking write per record on the driving task
    #[default]
    Sync,
    /// One write per record, dispatched off the driving task
    Async,
    /// One batch per harvested file
    Bulk,
}

impl FromStr for SubmitMode {
    type Err = MathdexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sync" => Ok(SubmitMode::Sync),
            "async" => Ok(SubmitMode::Async),
            "bulk" => Ok(SubmitMode::Bulk),
            other => Err(MathdexError::ConfigError(format!(
                "Unknown submit mode '{other}' (expected sync, async or bulk)"
            ))),
        }
    }
}

impl fmt::Display for SubmitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubmitMode::Sync => "sync",
            SubmitMode::Async => "async",
            SubmitMode::Bulk => "bulk",
        };
        f.write_str(name)
    }
}

/// Indexing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexingConfig {
    /// Number of concurrent extraction slots
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Maximum number of documents to discover (<= 0 means unlimited)
    #[serde(default)]
    pub doc_limit: i64,

    /// Maximum file size in MB (skip larger files)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: usize,

    /// Submission strategy
    #[serde(default)]
    pub submit_mode: SubmitMode,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding the Tantivy index
    #[serde(default = "default_index_dir")]
    pub index_dir: PathBuf,

    /// Prefix stripped from canonical file paths to build record paths
    #[serde(default)]
    pub storage_root: Option<PathBuf>,
}

fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn default_max_file_size() -> usize {
    100
}

fn default_index_dir() -> PathBuf {
    PathBuf::from("./index")
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            doc_limit: 0,
            max_file_size_mb: default_max_file_size(),
            submit_mode: SubmitMode::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            index_dir: default_index_dir(),
            storage_root: None,
        }
    }
}

impl IndexingConfig {
    /// Discovery limit as an option (`None` = unlimited)
    pub fn limit(&self) -> Option<usize> {
        if self.doc_limit > 0 {
            Some(self.doc_limit as usize)
        } else {
            None
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| MathdexError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. MATHDEX_CONFIG env var
    /// 2. XDG config file (~/.config/mathdex/config.toml)
    /// 3. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let config_file = xdg.config_file();
        let mut config = if config_file.exists() {
            Self::from_file(config_file)?
        } else if env::var("MATHDEX_CONFIG").is_ok() {
            return Err(MathdexError::ConfigError(format!(
                "Config file {config_file:?} does not exist"
            )));
        } else {
            Self::default()
        };

        // Relative default index dir moves under the XDG data dir
        if config.storage.index_dir == default_index_dir() {
            config.storage.index_dir = xdg.index_dir();
        }

        config.merge_env()?;
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) -> Result<()> {
        if let Ok(threads) = env::var("MATHDEX_THREADS") {
            if let Ok(n) = threads.parse() {
                self.indexing.threads = n;
            }
        }
        if let Ok(limit) = env::var("MATHDEX_DOC_LIMIT") {
            if let Ok(n) = limit.parse() {
                self.indexing.doc_limit = n;
            }
        }
        if let Ok(max_size) = env::var("MATHDEX_MAX_FILE_SIZE_MB") {
            if let Ok(size) = max_size.parse() {
                self.indexing.max_file_size_mb = size;
            }
        }
        if let Ok(mode) = env::var("MATHDEX_SUBMIT_MODE") {
            self.indexing.submit_mode = mode.parse()?;
        }

        if let Ok(index_dir) = env::var("MATHDEX_INDEX_DIR") {
            self.storage.index_dir = PathBuf::from(index_dir);
        }
        if let Ok(root) = env::var("MATHDEX_STORAGE_ROOT") {
            self.storage.storage_root = Some(PathBuf::from(root));
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.indexing.threads == 0 {
            return Err(MathdexError::ConfigError(
                "Thread count must be non-zero".to_string(),
            ));
        }

        if self.indexing.max_file_size_mb == 0 {
            return Err(MathdexError::ConfigError(
                "Max file size must be non-zero".to_string(),
            ));
        }

        if self.storage.index_dir.as_os_str().is_empty() {
            return Err(MathdexError::ConfigError(
                "Index directory must be set".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Threads: {}", self.indexing.threads);
        match self.indexing.limit() {
            Some(limit) => tracing::info!("  Document limit: {}", limit),
            None => tracing::info!("  Document limit: unlimited"),
        }
        tracing::info!("  Max file size: {} MB", self.indexing.max_file_size_mb);
        tracing::info!("  Submit mode: {}", self.indexing.submit_mode);
        tracing::info!("  Index dir: {:?}", self.storage.index_dir);
        if let Some(root) = &self.storage.storage_root {
            tracing::info!("  Storage root: {:?}", root);
        }
    }
}
