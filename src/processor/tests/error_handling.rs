//! Error handling tests

use super::{write_file, PEOPLE_CSV};
use crate::config::ParseErrorPolicy;
use crate::error::EtlError;
use crate::models::SourceFormat;
use crate::processor::RecordMerger;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn source_dir(temp_dir: &TempDir) -> PathBuf {
    let source = temp_dir.path().join("source");
    fs::create_dir_all(&source).unwrap();
    source
}

#[test]
fn test_nonexistent_source_directory() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nonexistent");

    let result = RecordMerger::new(&missing, temp_dir.path().join("out.csv")).process();

    match result {
        Err(EtlError::SourceNotFound { path }) => assert_eq!(path, missing),
        other => panic!("Expected SourceNotFound error, got {:?}", other),
    }
}

#[test]
fn test_xml_without_person_elements_contributes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let source = source_dir(&temp_dir);
    write_file(&source, "a.csv", PEOPLE_CSV);
    write_file(
        &source,
        "b.xml",
        "<data><employee><name>Eve</name></employee></data>",
    );

    for policy in [ParseErrorPolicy::Skip, ParseErrorPolicy::Abort] {
        let (df, stats) = RecordMerger::new(&source, temp_dir.path().join("out.csv"))
            .with_parse_error_policy(policy)
            .process()
            .unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(stats.files_empty, 1);
        assert_eq!(stats.files_failed, 0);
    }
}

#[test]
fn test_malformed_xml_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let source = source_dir(&temp_dir);
    write_file(&source, "a.csv", PEOPLE_CSV);
    write_file(&source, "b.xml", "<data><person><name>Eve</name></data>");

    let (df, stats) = RecordMerger::new(&source, temp_dir.path().join("out.csv"))
        .process()
        .unwrap();

    assert_eq!(df.height(), 2);
    assert_eq!(stats.files_failed, 1);
}

#[test]
fn test_malformed_csv_is_skipped_by_default() {
    let temp_dir = TempDir::new().unwrap();
    let source = source_dir(&temp_dir);
    write_file(&source, "a.csv", PEOPLE_CSV);
    write_file(&source, "b.csv", "name,height\nEve,60,extra\n");

    let (df, stats) = RecordMerger::new(&source, temp_dir.path().join("out.csv"))
        .process()
        .unwrap();

    assert_eq!(df.height(), 2);
    assert_eq!(stats.files_parsed, 1);
    assert_eq!(stats.files_failed, 1);
}

#[test]
fn test_malformed_csv_aborts_under_abort_policy() {
    let temp_dir = TempDir::new().unwrap();
    let source = source_dir(&temp_dir);
    write_file(&source, "a.csv", PEOPLE_CSV);
    let bad = write_file(&source, "b.csv", "name,height\nEve,60,extra\n");
    let output = temp_dir.path().join("out.csv");

    let result = RecordMerger::new(&source, &output)
        .with_parse_error_policy(ParseErrorPolicy::Abort)
        .process();

    match result {
        Err(EtlError::ParseFailed { path, format, .. }) => {
            assert_eq!(path, bad);
            assert_eq!(format, SourceFormat::Csv);
        }
        other => panic!("Expected ParseFailed error, got {:?}", other),
    }
    assert!(!output.exists());
}

#[test]
fn test_invalid_json_aborts_under_abort_policy() {
    let temp_dir = TempDir::new().unwrap();
    let source = source_dir(&temp_dir);
    write_file(&source, "a.json", "{\"name\": \"Ada\"}\nnot json\n");

    let result = RecordMerger::new(&source, temp_dir.path().join("out.csv"))
        .with_parse_error_policy(ParseErrorPolicy::Abort)
        .process();

    assert!(matches!(
        result,
        Err(EtlError::ParseFailed {
            format: SourceFormat::Json,
            ..
        })
    ));
}

#[test]
fn test_malformed_xml_aborts_under_abort_policy() {
    let temp_dir = TempDir::new().unwrap();
    let source = source_dir(&temp_dir);
    write_file(&source, "a.xml", "<data><person>");

    let result = RecordMerger::new(&source, temp_dir.path().join("out.csv"))
        .with_parse_error_policy(ParseErrorPolicy::Abort)
        .process();

    assert!(matches!(
        result,
        Err(EtlError::ParseFailed {
            format: SourceFormat::Xml,
            ..
        })
    ));
}

#[test]
fn test_non_numeric_height_fails_the_run() {
    let temp_dir = TempDir::new().unwrap();
    let source = source_dir(&temp_dir);
    write_file(&source, "a.csv", "name,height\nAda,65\nBob,tall\n");
    let output = temp_dir.path().join("out.csv");

    let result = RecordMerger::new(&source, &output).process();

    match result {
        Err(EtlError::UnitConversion { column, .. }) => assert_eq!(column, "height"),
        other => panic!("Expected UnitConversion error, got {:?}", other),
    }
    assert!(!output.exists());
}

#[test]
fn test_all_files_failing_gives_empty_output() {
    let temp_dir = TempDir::new().unwrap();
    let source = source_dir(&temp_dir);
    write_file(&source, "a.json", "oops\n");
    write_file(&source, "b.xml", "<unclosed>");

    let (df, stats) = RecordMerger::new(&source, temp_dir.path().join("out.csv"))
        .process()
        .unwrap();

    assert_eq!(df.height(), 0);
    assert_eq!(stats.files_failed, 2);
}

#[test]
fn test_padded_xml_height_is_converted() {
    let temp_dir = TempDir::new().unwrap();
    let source = source_dir(&temp_dir);
    write_file(
        &source,
        "a.xml",
        "<data><person><name>Ada</name><height>\n  65\n</height></person></data>",
    );
    write_file(&source, "b.csv", "name,weight\nBob,180 \n");
    let output = temp_dir.path().join("out.csv");

    let (df, _stats) = RecordMerger::new(&source, &output).process().unwrap();

    assert_eq!(df.height(), 2);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "name,height,weight\nAda,1.65,\nBob,,81.65\n"
    );
}
