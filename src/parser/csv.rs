//! Delimited text with a header row.

use crate::error::{EtlError, Result};
use crate::models::SourceFormat;
use crate::records::RecordSet;
use csv::ReaderBuilder;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

/// Read a CSV file; every data row becomes one record.
///
/// Empty fields are null. A row whose field count differs from the header
/// is a parse failure.
pub fn read_csv(path: &Path) -> Result<RecordSet> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_path(path)?;

    let headers = dedupe_headers(reader.headers()?.iter());
    let mut records = RecordSet::with_columns(headers.iter().cloned());

    for (line, row) in reader.records().enumerate() {
        let row = row.map_err(|e| {
            EtlError::parse_failed(path, SourceFormat::Csv, format!("row {}: {}", line + 1, e))
        })?;

        records.push(
            headers
                .iter()
                .zip(row.iter())
                .map(|(name, value)| (name.as_str(), non_empty(value))),
        );
    }

    debug!(
        "Read {} rows x {} columns from {}",
        records.len(),
        records.columns().len(),
        path.display()
    );

    Ok(records)
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Repeated header names get a numeric suffix (`a`, `a.1`, `a.2`).
///
/// A suffix is never reused: `x,x,x.1` becomes `x`, `x.1`, `x.1.1`.
fn dedupe_headers<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut used: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for name in names {
        let mut candidate = name.to_string();
        while used.contains(&candidate) {
            let count = counts.entry(name.to_string()).or_insert(0);
            *count += 1;
            candidate = format!("{}.{}", name, count);
        }
        used.insert(candidate.clone());
        out.push(candidate);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(temp_dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = temp_dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_simple_csv() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(
            &temp_dir,
            "people.csv",
            "name,height,weight\nAda,65,120\nBob,70,180\n",
        );

        let records = read_csv(&path).unwrap();

        assert_eq!(records.columns(), &["name", "height", "weight"]);
        assert_eq!(records.len(), 2);
        assert_eq!(records.get(1, "name"), Some("Bob"));
        assert_eq!(records.get(1, "weight"), Some("180"));
    }

    #[test]
    fn test_empty_field_is_null() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(&temp_dir, "people.csv", "name,height\nAda,\n");

        let records = read_csv(&path).unwrap();

        assert_eq!(records.get(0, "name"), Some("Ada"));
        assert_eq!(records.get(0, "height"), None);
    }

    #[test]
    fn test_quoted_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(
            &temp_dir,
            "people.csv",
            "name,address\n\"Lovelace, Ada\",\"12 \"\"Main\"\" St\"\n",
        );

        let records = read_csv(&path).unwrap();

        assert_eq!(records.get(0, "name"), Some("Lovelace, Ada"));
        assert_eq!(records.get(0, "address"), Some("12 \"Main\" St"));
    }

    #[test]
    fn test_header_only_file_has_columns_but_no_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(&temp_dir, "people.csv", "name,height\n");

        let records = read_csv(&path).unwrap();

        assert!(records.is_empty());
        assert_eq!(records.columns(), &["name", "height"]);
    }

    #[test]
    fn test_ragged_row_is_parse_failure() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(&temp_dir, "people.csv", "name,height\nAda,65\nBob,70,extra\n");

        let result = read_csv(&path);

        match result {
            Err(EtlError::ParseFailed { format, reason, .. }) => {
                assert_eq!(format, SourceFormat::Csv);
                assert!(reason.contains("row 2"));
            }
            other => panic!("Expected ParseFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_headers_are_suffixed() {
        let headers = dedupe_headers(["a", "b", "a", "a"].into_iter());
        assert_eq!(headers, vec!["a", "b", "a.1", "a.2"]);
    }

    #[test]
    fn test_suffix_never_collides_with_real_header() {
        let headers = dedupe_headers(["x", "x", "x.1"].into_iter());
        assert_eq!(headers, vec!["x", "x.1", "x.1.1"]);
    }

    #[test]
    fn test_colliding_headers_keep_every_value() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(&temp_dir, "people.csv", "x,x,x.1\n1,2,3\n");

        let records = read_csv(&path).unwrap();

        assert_eq!(records.columns(), &["x", "x.1", "x.1.1"]);
        assert_eq!(records.get(0, "x"), Some("1"));
        assert_eq!(records.get(0, "x.1"), Some("2"));
        assert_eq!(records.get(0, "x.1.1"), Some("3"));
    }
}
