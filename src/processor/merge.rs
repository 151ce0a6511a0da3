//! Concatenation and exact-duplicate removal.

use crate::error::Result;
use polars::prelude::*;
use tracing::debug;

/// Concatenate per-file frames in order and drop exact duplicate rows.
///
/// Columns are the union of all input columns (missing values are null).
/// Rows are compared across every column; the first occurrence is kept and
/// the original row order is preserved. No input frames gives an empty
/// frame.
pub fn merge_frames(frames: Vec<DataFrame>) -> Result<DataFrame> {
    if frames.is_empty() {
        debug!("No frames to merge");
        return Ok(DataFrame::empty());
    }

    debug!("Concatenating {} frames", frames.len());
    let lazy_frames: Vec<LazyFrame> = frames.into_iter().map(|df| df.lazy()).collect();

    let args = UnionArgs {
        parallel: false,
        rechunk: true,
        to_supertypes: true,
        ..Default::default()
    };

    let merged = concat_lf_diagonal(lazy_frames, args)?
        .unique_stable(None, UniqueKeepStrategy::First)
        .collect()?;

    Ok(merged)
}
