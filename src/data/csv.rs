//! Comma-separated persistence for [`Dataset`].
//!
//! Files carry a header row with the exact column names and one record per
//! line. Values are written in Rust's locale-independent shortest
//! round-trip form, so `100.0` becomes `100` and re-reads bit-identically.
//! Empty fields (and `NaN`/`NA`) read back as missing cells.

use super::{Column, Dataset};
use crate::error::{MetricsError, Result};
use std::fs;
use std::path::Path;
use tempfile::NamedTempFile;

/// Loads a dataset from a CSV file.
///
/// # Errors
///
/// Returns [`MetricsError::Load`] if the file cannot be opened, has no
/// header, has ragged records, or holds a non-numeric or infinite value.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let load_err = |message: String| MetricsError::Load {
        path: path.to_path_buf(),
        message,
    };

    let mut reader = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::All)
        .from_path(path)
        .map_err(|e| load_err(format!("failed to open CSV: {e}")))?;

    let headers = reader
        .headers()
        .map_err(|e| load_err(format!("failed to read header: {e}")))?
        .clone();
    if headers.is_empty() {
        return Err(load_err("missing header row".to_string()));
    }

    let mut columns: Vec<Column> = vec![Vec::new(); headers.len()];
    for result in reader.records() {
        let record = result.map_err(|e| load_err(format!("failed to read record: {e}")))?;
        let line = record.position().map_or(0, ::csv::Position::line);

        for (idx, field) in record.iter().enumerate() {
            let cell = parse_cell(field).ok_or_else(|| {
                load_err(format!(
                    "line {line}, column '{}': not a finite number: {field:?}",
                    &headers[idx]
                ))
            })?;
            columns[idx].push(cell);
        }
    }

    let named = headers
        .iter()
        .map(str::to_string)
        .zip(columns)
        .collect::<Vec<_>>();
    Dataset::new(named).map_err(|e| load_err(e.to_string()))
}

/// Writes a dataset to a CSV file, creating parent directories.
///
/// The table is written to a temporary file next to `path` and renamed into
/// place, so a failure never leaves a partial file at `path`.
///
/// # Errors
///
/// Returns [`MetricsError::Persist`] if any step fails.
pub fn write_csv<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<()> {
    let path = path.as_ref();
    let persist_err = |message: String| MetricsError::Persist {
        path: path.to_path_buf(),
        message,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| persist_err(format!("cannot create directory: {e}")))?;

    let tmp = NamedTempFile::new_in(dir)
        .map_err(|e| persist_err(format!("cannot create temporary file: {e}")))?;

    {
        let mut writer = ::csv::Writer::from_writer(tmp.as_file());
        writer
            .write_record(dataset.column_names())
            .map_err(|e| persist_err(e.to_string()))?;

        let columns: Vec<&[Option<f64>]> = dataset.iter_columns().map(|(_, c)| c).collect();
        for i in 0..dataset.n_rows() {
            writer
                .write_record(columns.iter().map(|col| format_cell(col[i])))
                .map_err(|e| persist_err(e.to_string()))?;
        }
        writer.flush().map_err(|e| persist_err(e.to_string()))?;
    }

    tmp.as_file()
        .sync_all()
        .map_err(|e| persist_err(e.to_string()))?;
    tmp.persist(path)
        .map_err(|e| persist_err(e.error.to_string()))?;
    Ok(())
}

/// `None` means malformed; `Some(None)` is a missing cell.
fn parse_cell(field: &str) -> Option<Option<f64>> {
    let missing = ["nan", "na", "null"];
    if field.is_empty() || missing.iter().any(|m| field.eq_ignore_ascii_case(m)) {
        return Some(None);
    }
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(Some(v)),
        _ => None,
    }
}

fn format_cell(cell: Option<f64>) -> String {
    cell.map(|v| v.to_string()).unwrap_or_default()
}
