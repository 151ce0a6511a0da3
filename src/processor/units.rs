//! Imperial to metric conversion of the measurement columns.

use crate::constants::units::{
    DECIMAL_PLACES, HEIGHT_COLUMN, INCHES_TO_METRES, POUNDS_TO_KILOGRAMS, WEIGHT_COLUMN,
};
use crate::error::{EtlError, Result};
use polars::prelude::*;
use tracing::debug;

/// Columns converted in place, with their multiplication factor
pub const CONVERSIONS: [(&str, f64); 2] = [
    (HEIGHT_COLUMN, INCHES_TO_METRES),
    (WEIGHT_COLUMN, POUNDS_TO_KILOGRAMS),
];

/// Convert `height` (inches → metres) and `weight` (pounds → kilograms).
///
/// Each column is converted only when present. Values are trimmed and
/// parsed as floats, nulls stay null, and any value that is not a number fails the
/// conversion. Returns the names of the converted columns.
pub fn convert_units(df: &mut DataFrame) -> Result<Vec<&'static str>> {
    let mut converted = Vec::new();
    for (column, factor) in CONVERSIONS {
        if convert_column(df, column, factor)? {
            converted.push(column);
        }
    }
    Ok(converted)
}

/// Multiply one column by `factor` and round; false when the column is absent
pub fn convert_column(df: &mut DataFrame, column: &str, factor: f64) -> Result<bool> {
    if df.get_column_index(column).is_none() {
        debug!("Column '{}' not present, no conversion", column);
        return Ok(false);
    }

    let numeric = trimmed(df.column(column)?.as_materialized_series())?
        .strict_cast(&DataType::Float64)
        .map_err(|e| EtlError::UnitConversion {
            column: column.to_string(),
            reason: e.to_string(),
        })?;

    let values: Vec<Option<f64>> = numeric
        .f64()?
        .into_iter()
        .map(|value| value.map(|v| round_to(v * factor, DECIMAL_PLACES)))
        .collect();

    df.with_column(Series::new(column.into(), values))?;
    debug!("Converted column '{}' with factor {}", column, factor);

    Ok(true)
}

/// Text cells with surrounding whitespace removed; other dtypes unchanged
fn trimmed(series: &Series) -> Result<Series> {
    if series.dtype() != &DataType::String {
        return Ok(series.clone());
    }
    let values: StringChunked = series.str()?.into_iter().map(|v| v.map(str::trim)).collect();
    Ok(values.with_name(series.name().clone()).into_series())
}

/// Round half away from zero to `places` decimals
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}
