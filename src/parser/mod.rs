//! Format-specific readers for raw record files.
//!
//! Each reader turns one file into a [`RecordSet`]. Parse failures are
//! reported as [`EtlError::ParseFailed`] so the merger can apply a single
//! failure policy across formats.

pub mod csv;
pub mod json;
pub mod xml;

use crate::error::{EtlError, Result};
use crate::models::SourceFormat;
use crate::records::RecordSet;
use std::path::Path;

/// Read a raw file with the reader for its format
pub fn read_source(path: &Path, format: SourceFormat) -> Result<RecordSet> {
    let result = match format {
        SourceFormat::Csv => csv::read_csv(path),
        SourceFormat::Json => json::read_json_lines(path),
        SourceFormat::Xml => xml::read_xml(path),
    };

    result.map_err(|e| match e {
        EtlError::ParseFailed { .. } => e,
        other => EtlError::parse_failed(path, format, other),
    })
}
