//! ETL Pipeline Library
//!
//! Merges person records delivered as CSV, JSON-lines and XML files into one
//! de-duplicated, metric-unit CSV, and moves the files through object storage
//! and a relational table.
//!
//! This library provides tools for:
//! - Reading each source format into a schema-less record set
//! - Merging record sets with exact-duplicate removal
//! - Converting `height` (inches) and `weight` (pounds) to metres and kilograms
//! - Staging raw, transformed and log files in an object store
//! - Replacing a database table with the merged rows

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod processor;
pub mod records;
pub mod sink;
pub mod storage;

// Re-export commonly used types
pub use config::{EtlConfig, ParseErrorPolicy};
pub use error::{EtlError, Result};
pub use models::{ProcessingStats, RunReport, SourceFormat};
pub use pipeline::Pipeline;
pub use processor::RecordMerger;
pub use records::RecordSet;
pub use sink::{SqliteSink, TableSink};
pub use storage::{LocalObjectStore, ObjectStore};
