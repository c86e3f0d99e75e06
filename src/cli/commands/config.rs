//! Config command - show current configuration

use crate::cli::output::{print_field, print_header};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config_file: String,
    pub data_dir: String,
    pub indexing: IndexingConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Serialize)]
pub struct IndexingConfig {
    pub threads: usize,
    pub doc_limit: i64,
    pub max_file_size_mb: usize,
    pub submit_mode: String,
}

#[derive(Debug, Serialize)]
pub struct StorageConfig {
    pub index_dir: String,
    pub storage_root: Option<String>,
}

/// Execute the config command
pub async fn execute(
    _args: ConfigArgs,
    services: &Arc<Services>,
    xdg: &XdgDirs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = &services.config;

    let response = ConfigResponse {
        config_file: xdg.config_file().to_string_lossy().into_owned(),
        data_dir: xdg.data_dir.to_string_lossy().into_owned(),
        indexing: IndexingConfig {
            threads: config.indexing.threads,
            doc_limit: config.indexing.doc_limit,
            max_file_size_mb: config.indexing.max_file_size_mb,
            submit_mode: config.indexing.submit_mode.to_string(),
        },
        storage: StorageConfig {
            index_dir: config.storage.index_dir.to_string_lossy().into_owned(),
            storage_root: config
                .storage
                .storage_root
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
        },
    };

    match format {
        OutputFormat::Human => {
            print_header("Configuration");
            print_field("config file", &response.config_file);
            print_field("data dir", &response.data_dir);
            print_field("threads", response.indexing.threads);
            print_field("doc limit", response.indexing.doc_limit);
            print_field("max file size", format!("{} MB", response.indexing.max_file_size_mb));
            print_field("submit mode", &response.indexing.submit_mode);
            print_field("index dir", &response.storage.index_dir);
            print_field(
                "storage root",
                response.storage.storage_root.as_deref().unwrap_or("(indexed path)"),
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
