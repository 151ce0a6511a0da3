//! Schema-less record sets.
//!
//! A [`RecordSet`] collects rows whose fields are discovered as they arrive.
//! Columns are the union of every field seen, in first-seen order; a row
//! that lacks a field holds null for it. Once a source file is read the set
//! is turned into a Polars [`DataFrame`] of string columns.

use crate::error::Result;
use polars::prelude::*;
use std::collections::HashMap;

/// Ordered rows over a dynamically discovered column set
#[derive(Debug, Default, Clone)]
pub struct RecordSet {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Option<String>>>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record set with a known header, in header order
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for name in columns {
            set.column_index(name.into());
        }
        set
    }

    /// Append a record; unknown field names extend the column set
    pub fn push<I, K>(&mut self, fields: I)
    where
        I: IntoIterator<Item = (K, Option<String>)>,
        K: Into<String>,
    {
        let mut row = vec![None; self.columns.len()];
        for (name, value) in fields {
            let idx = self.column_index(name.into());
            if idx >= row.len() {
                row.resize(idx + 1, None);
            }
            // Repeated field names within one record: the last value wins
            row[idx] = value;
        }
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `column` in row `row`, if both exist
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let idx = *self.index.get(column)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }

    /// Convert into a DataFrame with one string column per discovered field
    pub fn into_frame(self) -> Result<DataFrame> {
        let height = self.rows.len();
        let mut values: Vec<Vec<Option<String>>> = self
            .columns
            .iter()
            .map(|_| Vec::with_capacity(height))
            .collect();

        for row in self.rows {
            let mut cells = row.into_iter();
            for column in values.iter_mut() {
                column.push(cells.next().flatten());
            }
        }

        let columns: Vec<Column> = self
            .columns
            .iter()
            .zip(values)
            .map(|(name, data)| Column::new(name.as_str().into(), data))
            .collect();

        Ok(DataFrame::new(columns)?)
    }

    fn column_index(&mut self, name: String) -> usize {
        if let Some(&idx) = self.index.get(&name) {
            return idx;
        }
        let idx = self.columns.len();
        self.index.insert(name.clone(), idx);
        self.columns.push(name);
        idx
    }
}
