// ============================================================
// SPREADSHEET SOURCES
// ============================================================
// Load a source file into a columnar TabularDataset

mod csv_reader;
mod excel_reader;

pub use csv_reader::CsvReader;
pub use excel_reader::ExcelReader;

use crate::domain::dataset::{CellValue, Column, TabularDataset};
use crate::domain::error::{AppError, Result};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Workbook,
    Csv,
    Tsv,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "xla" | "xlam" | "ods" => Ok(SourceFormat::Workbook),
            "csv" => Ok(SourceFormat::Csv),
            "tsv" | "tab" => Ok(SourceFormat::Tsv),
            other => Err(AppError::ValidationError(format!(
                "Unsupported source file extension '{}' ({})",
                other,
                path.display()
            ))),
        }
    }
}

/// Read `path` into a dataset. The first row is the header.
///
/// `sheet` picks a worksheet by name for workbooks and is ignored for CSV.
pub fn read_dataset(path: &Path, sheet: Option<&str>) -> Result<TabularDataset> {
    if !path.exists() {
        return Err(AppError::FileNotFound(path.display().to_string()));
    }

    match SourceFormat::from_path(path)? {
        SourceFormat::Workbook => ExcelReader::new().with_sheet(sheet).read(path),
        SourceFormat::Csv => CsvReader::new().read(path),
        SourceFormat::Tsv => CsvReader::new().with_delimiter(b'\t').read(path),
    }
}

/// Header names, with blanks and duplicates made unique.
fn header_names(raw: &[String]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(raw.len());

    for (idx, name) in raw.iter().enumerate() {
        let base = match name.trim() {
            "" => format!("Unnamed: {}", idx),
            trimmed => trimmed.to_string(),
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while names.contains(&candidate) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        names.push(candidate);
    }

    names
}

/// Pivot header + row-major cells into columns.
///
/// Short rows are padded with `Missing`; cells past the header width are dropped.
/// Rows with no values at all are skipped.
fn build_dataset(header: &[String], rows: Vec<Vec<CellValue>>) -> Result<TabularDataset> {
    let names = header_names(header);
    let mut columns: Vec<Vec<CellValue>> = vec![Vec::with_capacity(rows.len()); names.len()];

    for row in rows {
        if row.iter().all(CellValue::is_missing) {
            continue;
        }
        let mut cells = row.into_iter();
        for column in columns.iter_mut() {
            column.push(cells.next().unwrap_or(CellValue::Missing));
        }
    }

    TabularDataset::new(
        names
            .into_iter()
            .zip(columns)
            .map(|(name, values)| Column::new(name, values))
            .collect(),
    )
}
