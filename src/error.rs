//! Error handling for ETL pipeline operations.
//!
//! Provides error types with context for source parsing, unit conversion,
//! object storage and relational sink failures.

use crate::models::SourceFormat;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Config file parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Directory traversal error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Source directory not found: {path}")]
    SourceNotFound { path: PathBuf },

    #[error("Failed to parse {format} file {path}: {reason}")]
    ParseFailed {
        path: PathBuf,
        format: SourceFormat,
        reason: String,
    },

    #[error("Unit conversion failed for column '{column}': {reason}")]
    UnitConversion { column: String, reason: String },

    #[error("Object not found: {bucket}/{key}")]
    ObjectNotFound { bucket: String, key: String },

    #[error("Invalid object key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl EtlError {
    /// Create a parse failure for a single source file
    pub fn parse_failed(
        path: impl Into<PathBuf>,
        format: SourceFormat,
        reason: impl ToString,
    ) -> Self {
        Self::ParseFailed {
            path: path.into(),
            format,
            reason: reason.to_string(),
        }
    }

    /// Create an invalid key error
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
