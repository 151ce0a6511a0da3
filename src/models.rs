//! Core data structures and types for ETL processing.
//!
//! Defines source formats, per-file outcomes and the statistics reported
//! by the merger and the pipeline driver.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Raw file formats understood by the merger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceFormat {
    Csv,
    Json,
    Xml,
}

impl SourceFormat {
    /// Detect the format from the lowercased file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();

        match ext.as_str() {
            "csv" => Some(SourceFormat::Csv),
            "json" => Some(SourceFormat::Json),
            "xml" => Some(SourceFormat::Xml),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Csv => "CSV",
            SourceFormat::Json => "JSON",
            SourceFormat::Xml => "XML",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to a single file during the merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Parsed and contributed this many rows
    Parsed { rows: usize },
    /// Parsed but held no records (XML without person elements)
    Empty,
    /// Parse failed and the file was skipped
    Failed { reason: String },
    /// Extension not handled
    Ignored,
}

/// Processing statistics for one merge
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub files_seen: usize,
    pub files_parsed: usize,
    pub files_empty: usize,
    pub files_failed: usize,
    pub files_ignored: usize,
    pub rows_read: usize,
    pub total_rows: usize,
    pub output_path: PathBuf,
    pub processing_time_ms: u128,
}

impl ProcessingStats {
    /// Fold one file outcome into the counters
    pub fn record(&mut self, outcome: &FileOutcome) {
        self.files_seen += 1;
        match outcome {
            FileOutcome::Parsed { rows } => {
                self.files_parsed += 1;
                self.rows_read += rows;
            }
            FileOutcome::Empty => self.files_empty += 1,
            FileOutcome::Failed { .. } => self.files_failed += 1,
            FileOutcome::Ignored => self.files_ignored += 1,
        }
    }

    /// Rows removed as exact duplicates
    pub fn duplicates_removed(&self) -> usize {
        self.rows_read.saturating_sub(self.total_rows)
    }
}

/// Summary of a full pipeline run
#[derive(Debug)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub raw_uploaded: usize,
    pub raw_downloaded: usize,
    pub transform: ProcessingStats,
    pub transformed_key: String,
    pub table: String,
    pub rows_loaded: usize,
    pub log_key: Option<String>,
    pub elapsed_ms: u128,
}
