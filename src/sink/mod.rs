//! Relational sink collaborator.

pub mod sqlite;

pub use sqlite::SqliteSink;

use crate::error::Result;
use polars::prelude::DataFrame;

/// Destination table store
pub trait TableSink {
    /// Replace the whole contents of `table` with the rows of `df`.
    ///
    /// Drop-and-recreate semantics: the table's previous columns and rows
    /// are discarded. Returns the number of rows written.
    fn replace_table(&mut self, table: &str, df: &DataFrame) -> Result<usize>;
}
