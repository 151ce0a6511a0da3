//! Delimited-text output for the merged table
//!
//! Writes the header and every row, without a row-index column, to a fixed
//! output path.

use crate::error::Result;
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// CSV writer for the transformed output
#[derive(Debug)]
pub struct CsvOutputWriter {
    output_path: PathBuf,
}

impl CsvOutputWriter {
    /// Create a new CSV writer
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Write the table and return the path it was written to
    pub fn write(&self, df: &mut DataFrame) -> Result<PathBuf> {
        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = File::create(&self.output_path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(df)?;

        debug!(
            "Wrote {} rows x {} columns to {}",
            df.height(),
            df.width(),
            self.output_path.display()
        );

        Ok(self.output_path.clone())
    }
}
