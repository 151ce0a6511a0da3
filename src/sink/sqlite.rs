//! SQLite-backed table sink.

use super::TableSink;
use crate::error::Result;
use polars::prelude::{AnyValue, DataFrame, DataType};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::path::Path;
use tracing::debug;

/// Table sink writing into one SQLite database
pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    /// Open (or create) the database file at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// In-memory database
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl TableSink for SqliteSink {
    fn replace_table(&mut self, table: &str, df: &DataFrame) -> Result<usize> {
        let table_ident = quote_ident(table);
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();

        let definitions: Vec<String> = df
            .get_columns()
            .iter()
            .zip(&names)
            .map(|(column, name)| format!("{} {}", quote_ident(name), sql_type(column.dtype())))
            .collect();

        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!("DROP TABLE IF EXISTS {};", table_ident))?;

        if names.is_empty() {
            // SQLite tables need at least one column
            tx.commit()?;
            debug!("Dropped table {} (no columns to recreate)", table);
            return Ok(0);
        }

        tx.execute_batch(&format!(
            "CREATE TABLE {} ({});",
            table_ident,
            definitions.join(", ")
        ))?;

        let insert = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table_ident,
            names
                .iter()
                .map(|n| quote_ident(n))
                .collect::<Vec<_>>()
                .join(", "),
            vec!["?"; names.len()].join(", ")
        );

        let columns = df.get_columns();
        {
            let mut stmt = tx.prepare(&insert)?;
            for row in 0..df.height() {
                let values = columns
                    .iter()
                    .map(|column| column.get(row).map(|v| sql_value(&v)))
                    .collect::<std::result::Result<Vec<Value>, _>>()?;
                stmt.execute(params_from_iter(values))?;
            }
        }
        tx.commit()?;

        debug!(
            "Replaced table {} with {} rows x {} columns",
            table,
            df.height(),
            names.len()
        );
        Ok(df.height())
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn sql_type(dtype: &DataType) -> &'static str {
    if dtype.is_float() {
        "REAL"
    } else if dtype.is_integer() || matches!(dtype, DataType::Boolean) {
        "INTEGER"
    } else {
        "TEXT"
    }
}

fn sql_value(value: &AnyValue) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Integer(*b as i64),
        AnyValue::Int32(v) => Value::Integer(*v as i64),
        AnyValue::Int64(v) => Value::Integer(*v),
        AnyValue::UInt32(v) => Value::Integer(*v as i64),
        AnyValue::Float32(v) => Value::Real(*v as f64),
        AnyValue::Float64(v) => Value::Real(*v),
        AnyValue::String(s) => Value::Text(s.to_string()),
        AnyValue::StringOwned(s) => Value::Text(s.to_string()),
        other => Value::Text(other.to_string()),
    }
}
