//! Pipeline driver.
//!
//! Runs the whole extract-transform-load sequence once, top to bottom:
//!
//! 1. upload the raw files of the source directory under `raw/`
//! 2. download every `raw/` object into the download directory
//! 3. merge, de-duplicate and convert the downloaded files
//! 4. upload the transformed CSV under `transformed/`
//! 5. replace the destination table with the merged rows
//! 6. upload the run log under `logs/`
//!
//! Any failure stops the run; nothing already uploaded is rolled back.

use crate::config::EtlConfig;
use crate::constants::{prefixes, BANNER_COMPLETED, BANNER_STARTED};
use crate::error::{EtlError, Result};
use crate::models::{ProcessingStats, RunReport};
use crate::processor::{discovery::FileDiscovery, RecordMerger};
use crate::sink::{SqliteSink, TableSink};
use crate::storage::{key_file_name, object_key, LocalObjectStore, ObjectStore};

use chrono::Utc;
use polars::prelude::DataFrame;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// One configured pipeline with its storage and database collaborators
pub struct Pipeline<S, T> {
    config: EtlConfig,
    store: S,
    sink: T,
}

impl Pipeline<LocalObjectStore, SqliteSink> {
    /// Build the pipeline with the local object store and SQLite sink
    pub fn from_config(config: EtlConfig) -> Result<Self> {
        config.validate()?;
        let store = LocalObjectStore::new(config.storage.root.clone());
        let sink = SqliteSink::open(&config.database.path)?;
        Ok(Self::new(config, store, sink))
    }
}

impl<S: ObjectStore, T: TableSink> Pipeline<S, T> {
    pub fn new(config: EtlConfig, store: S, sink: T) -> Self {
        Self {
            config,
            store,
            sink,
        }
    }

    pub fn config(&self) -> &EtlConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sink(&self) -> &T {
        &self.sink
    }

    /// Run every step in order
    pub fn run(&mut self) -> Result<RunReport> {
        let started_at = Utc::now();
        let start_time = Instant::now();
        info!("{}", BANNER_STARTED);

        let source_dir = self.config.paths.source_dir.clone();
        let download_dir = self.config.paths.download_dir.clone();

        let raw_uploaded = self.upload_raw_files(&source_dir)?;
        let raw_downloaded = self.download_raw_files(&download_dir)?;
        let (df, transform) = self.transform(&download_dir)?;
        let transformed_key = self.upload_transformed(&transform.output_path)?;
        let rows_loaded = self.load_table(&df)?;
        let log_key = self.upload_log()?;

        info!("{}", BANNER_COMPLETED);

        Ok(RunReport {
            started_at,
            raw_uploaded,
            raw_downloaded,
            transform,
            transformed_key,
            table: self.config.database.table.clone(),
            rows_loaded,
            log_key,
            elapsed_ms: start_time.elapsed().as_millis(),
        })
    }

    /// Put every regular file of `folder` under `raw/`
    pub fn upload_raw_files(&self, folder: &Path) -> Result<usize> {
        info!("Uploading raw files to object storage...");
        let bucket = &self.config.storage.bucket;

        let files = FileDiscovery::new(folder).discover_files()?;
        for file_path in &files {
            let file_name = file_name_of(file_path)?;
            self.store
                .upload_file(file_path, bucket, &object_key(prefixes::RAW, &file_name))?;
            info!("Uploaded {} to {}/{}", file_name, bucket, prefixes::RAW);
        }

        info!("All raw files uploaded to object storage.");
        Ok(files.len())
    }

    /// Get every `raw/` object into `destination`, named by its last key segment
    pub fn download_raw_files(&self, destination: &Path) -> Result<usize> {
        info!("Downloading raw files from object storage...");
        fs::create_dir_all(destination)?;
        let bucket = &self.config.storage.bucket;

        let mut downloaded = 0;
        for key in self.store.list(bucket, prefixes::RAW)? {
            let file_name = key_file_name(&key);
            if file_name.is_empty() {
                continue;
            }
            let download_path = destination.join(file_name);
            self.store.download_file(bucket, &key, &download_path)?;
            info!("Downloaded {} to {}", file_name, download_path.display());
            downloaded += 1;
        }

        Ok(downloaded)
    }

    /// Run the merger over `folder`, writing the configured output file
    pub fn transform(&self, folder: &Path) -> Result<(DataFrame, ProcessingStats)> {
        RecordMerger::from_config(folder, &self.config).process()
    }

    /// Put the transformed file under `transformed/`
    pub fn upload_transformed(&self, file_path: &Path) -> Result<String> {
        info!("Uploading transformed file to object storage...");
        let key = object_key(prefixes::TRANSFORMED, &file_name_of(file_path)?);
        self.store
            .upload_file(file_path, &self.config.storage.bucket, &key)?;
        info!("Transformed file uploaded to object storage.");
        Ok(key)
    }

    /// Replace the destination table with the merged rows
    pub fn load_table(&mut self, df: &DataFrame) -> Result<usize> {
        info!(
            "Loading transformed data into database {}...",
            self.config.database.display_url()
        );
        let table = self.config.database.table.clone();
        let rows = self.sink.replace_table(&table, df)?;
        info!("Data loaded into table: {} ({} rows)", table, rows);
        Ok(rows)
    }

    /// Put the run log under `logs/`; skipped when there is no log file
    pub fn upload_log(&self) -> Result<Option<String>> {
        info!("Uploading log file to object storage...");
        let log_path = &self.config.paths.log_path;
        if !log_path.is_file() {
            warn!("Log file {} not found, skipping upload", log_path.display());
            return Ok(None);
        }

        let key = object_key(prefixes::LOGS, &file_name_of(log_path)?);
        self.store
            .upload_file(log_path, &self.config.storage.bucket, &key)?;
        info!("Log file uploaded to object storage.");
        Ok(Some(key))
    }
}

fn file_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| EtlError::Configuration {
            message: format!("Path '{}' does not name a file", path.display()),
        })
}
