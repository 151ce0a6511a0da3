//! Format-normalizing merger.
//!
//! Reads every file of one directory, dispatches each to the reader for its
//! format, merges the per-file tables, removes exact duplicates, converts
//! the measurement columns to metric units and writes the result as CSV.

pub mod discovery;
pub mod merge;
pub mod units;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::{discovery::FileDiscovery, writer::CsvOutputWriter};

use crate::config::{EtlConfig, ParseErrorPolicy};
use crate::constants::XML_RECORD_ELEMENT;
use crate::error::{EtlError, Result};
use crate::models::{FileOutcome, ProcessingStats, SourceFormat};
use crate::parser;

use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Merger for one directory of raw record files
#[derive(Debug)]
pub struct RecordMerger {
    file_discovery: FileDiscovery,
    csv_writer: CsvOutputWriter,
    parse_error_policy: ParseErrorPolicy,
}

impl RecordMerger {
    /// Create a merger reading `source_dir` and writing `output_path`
    pub fn new(source_dir: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            file_discovery: FileDiscovery::new(source_dir),
            csv_writer: CsvOutputWriter::new(output_path),
            parse_error_policy: ParseErrorPolicy::default(),
        }
    }

    /// Create a merger for `source_dir` using the configured output and policy
    pub fn from_config(source_dir: impl Into<PathBuf>, config: &EtlConfig) -> Self {
        Self::new(source_dir, config.paths.output_path.clone())
            .with_parse_error_policy(config.on_parse_error)
    }

    /// Configure how files that fail to parse are handled
    pub fn with_parse_error_policy(mut self, policy: ParseErrorPolicy) -> Self {
        self.parse_error_policy = policy;
        self
    }

    pub fn output_path(&self) -> &Path {
        self.csv_writer.output_path()
    }

    /// Merge, convert and write; the returned stats carry the output path
    pub fn process(&self) -> Result<(DataFrame, ProcessingStats)> {
        let start_time = Instant::now();
        info!("Transforming data...");

        let (mut df, mut stats) = self.merge()?;

        let output_path = self.csv_writer.write(&mut df)?;
        info!("Transformed data saved to {}", output_path.display());

        stats.output_path = output_path;
        stats.processing_time_ms = start_time.elapsed().as_millis();
        Ok((df, stats))
    }

    /// Read, merge, de-duplicate and convert without writing anything
    pub fn merge(&self) -> Result<(DataFrame, ProcessingStats)> {
        let files = self.file_discovery.discover_files()?;
        info!(
            "Found {} files in {}",
            files.len(),
            self.file_discovery.source_dir().display()
        );

        let progress = ProgressBar::new(files.len() as u64);
        progress.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );

        let mut stats = ProcessingStats::default();
        let mut frames = Vec::new();

        for path in &files {
            if let Some(name) = path.file_name() {
                progress.set_message(name.to_string_lossy().to_string());
            }

            let (outcome, frame) = match self.read_file(path) {
                Ok(result) => result,
                Err(e) => {
                    progress.abandon_with_message("Aborted");
                    return Err(e);
                }
            };
            stats.record(&outcome);
            frames.extend(frame);
            progress.inc(1);
        }
        progress.finish_and_clear();

        let mut df = merge::merge_frames(frames)?;
        stats.total_rows = df.height();
        info!(
            "Merged {} rows into {} ({} duplicates removed)",
            stats.rows_read,
            stats.total_rows,
            stats.duplicates_removed()
        );

        let converted = units::convert_units(&mut df)?;
        if !converted.is_empty() {
            info!("Converted units for columns: {}", converted.join(", "));
        }

        Ok((df, stats))
    }

    /// Read one file, applying the parse failure policy
    fn read_file(&self, path: &Path) -> Result<(FileOutcome, Option<DataFrame>)> {
        let Some(format) = SourceFormat::from_path(path) else {
            debug!("Skipping unsupported file: {}", path.display());
            return Ok((FileOutcome::Ignored, None));
        };

        let records = match parser::read_source(path, format) {
            Ok(records) => records,
            Err(e @ EtlError::ParseFailed { .. }) => {
                return match self.parse_error_policy {
                    ParseErrorPolicy::Abort => Err(e),
                    ParseErrorPolicy::Skip => {
                        error!("{}", e);
                        Ok((
                            FileOutcome::Failed {
                                reason: e.to_string(),
                            },
                            None,
                        ))
                    }
                };
            }
            Err(e) => return Err(e),
        };

        if format == SourceFormat::Xml && records.is_empty() {
            warn!(
                "No <{}> elements found in XML file: {}",
                XML_RECORD_ELEMENT,
                path.display()
            );
            return Ok((FileOutcome::Empty, None));
        }

        if records.columns().is_empty() {
            debug!("No fields in {}, contributes no rows", path.display());
            return Ok((FileOutcome::Empty, None));
        }

        let rows = records.len();
        debug!("Parsed {} {} rows from {}", rows, format, path.display());
        Ok((FileOutcome::Parsed { rows }, Some(records.into_frame()?)))
    }
}
