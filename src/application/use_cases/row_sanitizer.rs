//! Row sanitization for JSON transmission.
//!
//! Runs in two passes over the dataset, then converts rows to records:
//! - timestamp columns are rendered as `YYYY-MM-DDTHH:MM:SS` text
//! - missing cells and non-finite floats become null
//!
//! Text passes through untouched, empty strings included.

use crate::domain::dataset::{
    CellValue, ColumnKind, RowRecord, SanitizedValue, TabularDataset,
};
use chrono::NaiveDateTime;
use tracing::debug;

pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

/// Render every timestamp in `DateTime` columns as ISO text.
///
/// Formatted columns become `Text`. Cells that are not timestamps stay as
/// they are.
pub fn format_datetime_columns(dataset: &mut TabularDataset) -> usize {
    let mut formatted = 0usize;

    for column in dataset.columns_mut() {
        if column.kind != ColumnKind::DateTime {
            continue;
        }

        for value in column.values.iter_mut() {
            if let CellValue::DateTime(ts) = value {
                *value = CellValue::Text(format_timestamp(ts));
                formatted += 1;
            }
        }
        column.kind = ColumnKind::Text;
    }

    formatted
}

/// Replace missing cells, NaN and infinities with `Missing` across all columns.
pub fn replace_null_like(dataset: &mut TabularDataset) -> usize {
    let mut replaced = 0usize;

    for column in dataset.columns_mut() {
        for value in column.values.iter_mut() {
            if let CellValue::Float(v) = value {
                if !v.is_finite() {
                    *value = CellValue::Missing;
                    replaced += 1;
                }
            } else if value.is_missing() {
                replaced += 1;
            }
        }
    }

    replaced
}

fn to_sanitized(value: &CellValue) -> SanitizedValue {
    match value {
        CellValue::Missing => SanitizedValue::Null,
        CellValue::Int(v) => SanitizedValue::from(*v),
        CellValue::Float(v) => SanitizedValue::from_f64(*v),
        CellValue::Bool(v) => SanitizedValue::Bool(*v),
        // only reachable for timestamps outside DateTime columns
        CellValue::DateTime(ts) => SanitizedValue::Text(format_timestamp(ts)),
        CellValue::Text(s) => SanitizedValue::Text(s.clone()),
    }
}

/// One record per row, keys in column order.
pub fn to_records(dataset: &TabularDataset) -> Vec<RowRecord> {
    let columns = dataset.columns();

    (0..dataset.row_count())
        .map(|row| {
            let mut record = RowRecord::with_capacity(columns.len());
            for column in columns {
                record.push(column.name.clone(), to_sanitized(&column.values[row]));
            }
            record
        })
        .collect()
}

/// Sanitize the dataset in place and return its rows as records.
///
/// Date formatting runs before null replacement so formatted date columns
/// are never looked at as numerics.
pub fn sanitize(dataset: &mut TabularDataset) -> Vec<RowRecord> {
    let formatted = format_datetime_columns(dataset);
    let nulls = replace_null_like(dataset);
    debug!(formatted, nulls, "Sanitized dataset");

    to_records(dataset)
}
