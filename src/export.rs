//! CSV export of a view, or of the whole source table.
//!
//! Both exports render values through the engine's formatters. Delivering the
//! text to the user (a browser download) is the caller's business.

use crate::engine::{TableSource, ViewEngine};
use crate::error::Result;
use crate::types::CsvOptions;

/// Suggested file name for a downloaded export.
pub const CSV_FILE_NAME: &str = "perspective.csv";

const FORMATTED: CsvOptions = CsvOptions { formatted: true };

/// Formatted CSV of `view` as currently pivoted and sorted.
pub async fn export_csv<V: ViewEngine + ?Sized>(view: &V) -> Result<String> {
    let csv = view.to_csv(&FORMATTED).await?;
    log::info!("exported view as CSV ({} bytes)", csv.len());
    Ok(csv)
}

/// Formatted CSV of every column of `table`, without pivots.
pub async fn export_flat_csv<T: TableSource + ?Sized>(table: &T) -> Result<String> {
    let csv = table.to_flat_csv(&FORMATTED).await?;
    log::info!("exported flat table as CSV ({} bytes)", csv.len());
    Ok(csv)
}
