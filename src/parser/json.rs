//! Newline-delimited JSON: one object per line.

use crate::error::{EtlError, Result};
use crate::models::SourceFormat;
use crate::records::RecordSet;
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Read a JSON-lines file; every object becomes one record.
///
/// Blank lines are skipped. A line that is not a JSON object is a parse
/// failure.
pub fn read_json_lines(path: &Path) -> Result<RecordSet> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = RecordSet::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(&line).map_err(|e| {
            EtlError::parse_failed(path, SourceFormat::Json, format!("line {}: {}", line_num + 1, e))
        })?;

        let Value::Object(object) = value else {
            return Err(EtlError::parse_failed(
                path,
                SourceFormat::Json,
                format!("line {}: expected an object", line_num + 1),
            ));
        };

        records.push(
            object
                .into_iter()
                .map(|(name, value)| (name, scalar_text(value))),
        );
    }

    debug!(
        "Read {} records x {} columns from {}",
        records.len(),
        records.columns().len(),
        path.display()
    );

    Ok(records)
}

/// Render a JSON value as the cell text shared by every format
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(number_text(&n)),
        nested => Some(nested.to_string()),
    }
}

/// Integral floats (`65.0`) are written like integers so they match CSV and XML text
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

/// Largest magnitude below which every integral f64 converts exactly
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;
