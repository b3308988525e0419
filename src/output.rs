//! Output formatting and persistence for result tables.
//!
//! Supports JSON logging, JSON files, and CSV files.

use anyhow::Result;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use tracing::info;

use crate::aggregate::CountPivot;
use crate::error::Error;

/// Logs rows as pretty-printed JSON.
pub fn print_json<T: Serialize>(rows: &[T]) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(rows)?);
    Ok(())
}

/// Writes rows as pretty-printed JSON to `path`.
pub fn write_json<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, rows)?;
    info!(path = %path.display(), rows = rows.len(), "JSON written");
    Ok(())
}

fn csv_error(path: &Path, source: csv::Error) -> Error {
    Error::Csv {
        path: path.to_path_buf(),
        source,
    }
}

/// Writes rows to a CSV file with a header derived from the field names,
/// replacing any existing file. Missing values become empty cells.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| csv_error(path, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| csv_error(path, e))?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = rows.len(), "CSV written");
    Ok(())
}

/// Writes a pivot as `year,<column>...` with one line per year.
pub fn write_pivot_csv(path: &Path, pivot: &CountPivot) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| csv_error(path, e))?;

    let mut header = vec!["year".to_string()];
    header.extend(pivot.columns.iter().cloned());
    writer.write_record(&header).map_err(|e| csv_error(path, e))?;

    for row in &pivot.rows {
        let mut record = vec![row.year.to_string()];
        record.extend(row.counts.iter().map(usize::to_string));
        writer.write_record(&record).map_err(|e| csv_error(path, e))?;
    }
    writer.flush()?;

    info!(path = %path.display(), years = pivot.rows.len(), columns = pivot.columns.len(), "Pivot CSV written");
    Ok(())
}
