use super::build_dataset;
use crate::domain::dataset::{CellValue, TabularDataset};
use crate::domain::error::{AppError, Result};
use calamine::{open_workbook_auto, Data, DataType, Range, Reader};
use std::path::Path;
use tracing::debug;

/// Excel / OpenDocument reader. Reads the first worksheet unless a sheet
/// name is given.
#[derive(Debug, Default, Clone)]
pub struct ExcelReader {
    sheet: Option<String>,
}

impl ExcelReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, sheet: Option<&str>) -> Self {
        self.sheet = sheet.map(str::to_string);
        self
    }

    pub fn read(&self, path: &Path) -> Result<TabularDataset> {
        if !path.exists() {
            return Err(AppError::FileNotFound(path.display().to_string()));
        }

        let mut workbook = open_workbook_auto(path).map_err(|e| {
            AppError::ParseError(format!(
                "Failed to open workbook {}: {}",
                path.display(),
                e
            ))
        })?;

        let range = match &self.sheet {
            Some(name) => {
                let names = workbook.sheet_names();
                if !names.iter().any(|n| n == name) {
                    return Err(AppError::ValidationError(format!(
                        "Worksheet '{}' not found (available: {})",
                        name,
                        names.join(", ")
                    )));
                }
                workbook.worksheet_range(name).map_err(|e| {
                    AppError::ParseError(format!("Failed to read worksheet '{}': {}", name, e))
                })?
            }
            None => workbook
                .worksheet_range_at(0)
                .ok_or_else(|| AppError::ParseError("No worksheet found".to_string()))?
                .map_err(|e| AppError::ParseError(format!("Failed to read worksheet: {}", e)))?,
        };

        debug!(
            rows = range.height(),
            columns = range.width(),
            "Worksheet loaded"
        );

        dataset_from_range(&range)
    }
}

/// Build a dataset from a worksheet range. The first row is the header.
pub fn dataset_from_range(range: &Range<Data>) -> Result<TabularDataset> {
    let mut rows = range.rows();

    let header: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(header_text).collect(),
        None => return TabularDataset::new(Vec::new()),
    };

    let body = rows
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    build_dataset(&header, body)
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Float(v) if v.fract() == 0.0 => format!("{}", *v as i64),
        other => other.to_string(),
    }
}

/// Convert a calamine cell.
///
/// Whole-number floats become integers, so a column of whole numbers is an
/// integer column. Error cells (`#N/A`, `#DIV/0!`, ...) count as missing.
pub fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Missing,
        Data::Int(v) => CellValue::Int(*v),
        Data::Float(v) => {
            if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15 {
                CellValue::Int(*v as i64)
            } else {
                CellValue::Float(*v)
            }
        }
        Data::Bool(v) => CellValue::Bool(*v),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
            Some(ts) => CellValue::DateTime(ts),
            None => CellValue::Text(cell.to_string()),
        },
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
