//! End-to-end runs of the ETL pipeline against a temporary object store and
//! SQLite database.

use etl_pipeline::{
    EtlConfig, EtlError, LocalObjectStore, ObjectStore, ParseErrorPolicy, Pipeline, SqliteSink,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PEOPLE_CSV: &str = "name,age,height,weight\nAda,36,65,120\nBob,41,70,180\n";
const PEOPLE_JSON: &str = "{\"name\": \"Ada\", \"age\": 36, \"height\": 65, \"weight\": 120}\n\
                           {\"name\": \"Cy\", \"age\": 29, \"height\": 68, \"weight\": 150}\n";
const PEOPLE_XML: &str = "<?xml version=\"1.0\"?>\n<people>\n  \
                          <person><name>Bob</name><age>41</age><height>70</height><weight>180</weight></person>\n  \
                          <person><name>Dee</name><age>52</age><height>62</height><weight>130</weight></person>\n\
                          </people>\n";

const EXPECTED_OUTPUT: &str = "name,age,height,weight\n\
                               Ada,36,1.65,54.43\n\
                               Bob,41,1.78,81.65\n\
                               Cy,29,1.73,68.04\n\
                               Dee,52,1.57,58.97\n";

fn test_config(root: &Path) -> EtlConfig {
    EtlConfig::default()
        .with_source_dir(root.join("source"))
        .with_download_dir(root.join("downloaded_raw"))
        .with_output_path(root.join("transformed_output.csv"))
        .with_log_path(root.join("etl_pipeline.log"))
        .with_storage_root(root.join("object_store"))
        .with_database_path(root.join("etl.sqlite3"))
}

fn write_sources(root: &Path) {
    let source = root.join("source");
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("a_people.csv"), PEOPLE_CSV).unwrap();
    fs::write(source.join("b_people.json"), PEOPLE_JSON).unwrap();
    fs::write(source.join("c_people.xml"), PEOPLE_XML).unwrap();
}

fn table_count(pipeline: &Pipeline<LocalObjectStore, SqliteSink>, table: &str) -> i64 {
    pipeline
        .sink()
        .connection()
        .query_row(&format!("SELECT COUNT(*) FROM \"{}\"", table), [], |r| r.get(0))
        .unwrap()
}

#[test]
fn test_full_run_moves_files_through_every_step() {
    let temp_dir = TempDir::new().unwrap();
    write_sources(temp_dir.path());
    let config = test_config(temp_dir.path());
    fs::write(&config.paths.log_path, "run log\n").unwrap();

    let mut pipeline = Pipeline::from_config(config).unwrap();
    let report = pipeline.run().unwrap();

    assert_eq!(report.raw_uploaded, 3);
    assert_eq!(report.raw_downloaded, 3);
    assert_eq!(report.transform.rows_read, 6);
    assert_eq!(report.transform.total_rows, 4);
    assert_eq!(report.transformed_key, "transformed/transformed_output.csv");
    assert_eq!(report.table, "etl_transformed_data");
    assert_eq!(report.rows_loaded, 4);
    assert_eq!(report.log_key.as_deref(), Some("logs/etl_pipeline.log"));

    let store = pipeline.store();
    let bucket = &pipeline.config().storage.bucket;
    assert_eq!(
        store.list(bucket, "raw/").unwrap(),
        vec!["raw/a_people.csv", "raw/b_people.json", "raw/c_people.xml"]
    );
    let transformed = store
        .get(bucket, "transformed/transformed_output.csv")
        .unwrap();
    assert_eq!(String::from_utf8(transformed).unwrap(), EXPECTED_OUTPUT);
    assert_eq!(
        store.get(bucket, "logs/etl_pipeline.log").unwrap(),
        b"run log\n"
    );

    assert!(temp_dir.path().join("downloaded_raw/b_people.json").is_file());
    assert_eq!(table_count(&pipeline, "etl_transformed_data"), 4);
}

#[test]
fn test_loaded_table_holds_metric_values() {
    let temp_dir = TempDir::new().unwrap();
    write_sources(temp_dir.path());

    let mut pipeline = Pipeline::from_config(test_config(temp_dir.path())).unwrap();
    pipeline.run().unwrap();

    let (height, weight): (f64, f64) = pipeline
        .sink()
        .connection()
        .query_row(
            "SELECT height, weight FROM etl_transformed_data WHERE name = 'Dee'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(height, 1.57);
    assert_eq!(weight, 58.97);
}

#[test]
fn test_missing_log_file_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    write_sources(temp_dir.path());

    let mut pipeline = Pipeline::from_config(test_config(temp_dir.path())).unwrap();
    let report = pipeline.run().unwrap();

    assert_eq!(report.log_key, None);
    let bucket = &pipeline.config().storage.bucket;
    assert!(pipeline.store().list(bucket, "logs/").unwrap().is_empty());
}

#[test]
fn test_second_run_replaces_table_and_output() {
    let temp_dir = TempDir::new().unwrap();
    write_sources(temp_dir.path());
    let config = test_config(temp_dir.path());
    let output_path = config.paths.output_path.clone();

    let mut pipeline = Pipeline::from_config(config).unwrap();
    pipeline.run().unwrap();
    let first = fs::read(&output_path).unwrap();
    pipeline.run().unwrap();
    let second = fs::read(&output_path).unwrap();

    assert_eq!(first, second);
    assert_eq!(table_count(&pipeline, "etl_transformed_data"), 4);
}

#[test]
fn test_objects_already_under_raw_are_included() {
    let temp_dir = TempDir::new().unwrap();
    write_sources(temp_dir.path());
    let config = test_config(temp_dir.path());

    // Left over from an earlier run with a different source directory
    let store = LocalObjectStore::new(&config.storage.root);
    store
        .put(
            &config.storage.bucket,
            "raw/d_people.csv",
            b"name,age,height,weight\nEd,60,72,200\n",
        )
        .unwrap();

    let mut pipeline = Pipeline::from_config(config).unwrap();
    let report = pipeline.run().unwrap();

    assert_eq!(report.raw_uploaded, 3);
    assert_eq!(report.raw_downloaded, 4);
    assert_eq!(report.rows_loaded, 5);
}

#[test]
fn test_missing_source_directory_fails_before_upload() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(temp_dir.path());

    let mut pipeline = Pipeline::from_config(config).unwrap();
    let result = pipeline.run();

    assert!(matches!(result, Err(EtlError::SourceNotFound { .. })));
    assert!(!temp_dir.path().join("transformed_output.csv").exists());
}

#[test]
fn test_strict_policy_aborts_run_on_malformed_source() {
    let temp_dir = TempDir::new().unwrap();
    write_sources(temp_dir.path());
    fs::write(
        temp_dir.path().join("source/d_broken.csv"),
        "name,height\nAda,65,extra\n",
    )
    .unwrap();
    let config =
        test_config(temp_dir.path()).with_parse_error_policy(ParseErrorPolicy::Abort);

    let mut pipeline = Pipeline::from_config(config).unwrap();
    let result = pipeline.run();

    assert!(matches!(result, Err(EtlError::ParseFailed { .. })));
    // Raw files were already staged; nothing is rolled back
    let bucket = &pipeline.config().storage.bucket;
    assert_eq!(pipeline.store().list(bucket, "raw/").unwrap().len(), 4);
    assert!(
        pipeline
            .store()
            .list(bucket, "transformed/")
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_default_policy_skips_malformed_source() {
    let temp_dir = TempDir::new().unwrap();
    write_sources(temp_dir.path());
    fs::write(
        temp_dir.path().join("source/d_broken.json"),
        "{\"name\": \"Zed\"\nnot json\n",
    )
    .unwrap();

    let mut pipeline = Pipeline::from_config(test_config(temp_dir.path())).unwrap();
    let report = pipeline.run().unwrap();

    assert_eq!(report.transform.files_failed, 1);
    assert_eq!(report.rows_loaded, 4);
}
