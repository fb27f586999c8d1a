// ============================================================
// CSV READER
// ============================================================
// CSV sources with encoding fallback and light cell typing

use super::build_dataset;
use crate::domain::dataset::{CellValue, TabularDataset};
use crate::domain::error::{AppError, Result};
use csv::{ReaderBuilder, Trim};
use std::path::Path;

/// CSV reader. Dates are not parsed; they stay text.
pub struct CsvReader {
    /// Delimiter character (default: comma)
    delimiter: u8,

    /// Whether to trim whitespace from values
    trim: bool,
}

impl Default for CsvReader {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: true,
        }
    }
}

impl CsvReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn read(&self, path: &Path) -> Result<TabularDataset> {
        let bytes = std::fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::FileNotFound(path.display().to_string())
            } else {
                AppError::IoError(format!("Failed to read {}: {}", path.display(), e))
            }
        })?;

        self.parse_content(&decode(&bytes))
    }

    pub fn parse_content(&self, content: &str) -> Result<TabularDataset> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(true)
            .from_reader(content.as_bytes());

        let header: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut raw_rows: Vec<Vec<String>> = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;
            raw_rows.push(record.iter().map(str::to_string).collect());
        }

        let types = column_types(&raw_rows, header.len());
        let rows: Vec<Vec<CellValue>> = raw_rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&types)
                    .map(|(raw, ty)| type_cell(raw, *ty))
                    .collect()
            })
            .collect();

        build_dataset(&header, rows)
    }
}

/// UTF-8 first (BOM stripped), Windows-1252 otherwise.
fn decode(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(content) => content.to_string(),
        Err(_) => {
            let (content, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            content.into_owned()
        }
    }
}

/// Type a CSV column is loaded as, decided from all of its non-empty cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CsvType {
    Int,
    Float,
    Bool,
    Text,
}

fn is_bool_literal(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
}

/// One type per column. A column is numeric or boolean only when every
/// non-empty cell parses as such; one stray value keeps the whole column text.
fn column_types(rows: &[Vec<String>], width: usize) -> Vec<CsvType> {
    (0..width)
        .map(|index| {
            let mut ints = true;
            let mut floats = true;
            let mut bools = true;

            let values = rows
                .iter()
                .filter_map(|row| row.get(index))
                .map(|raw| raw.trim())
                .filter(|value| !value.is_empty());

            for value in values {
                ints &= value.parse::<i64>().is_ok();
                floats &= value.parse::<f64>().is_ok();
                bools &= is_bool_literal(value);
                if !(ints || floats || bools) {
                    break;
                }
            }

            if ints {
                CsvType::Int
            } else if floats {
                CsvType::Float
            } else if bools {
                CsvType::Bool
            } else {
                CsvType::Text
            }
        })
        .collect()
}

fn type_cell(raw: &str, ty: CsvType) -> CellValue {
    let value = raw.trim();
    if value.is_empty() {
        return CellValue::Missing;
    }

    match ty {
        CsvType::Int => value
            .parse::<i64>()
            .map(CellValue::Int)
            .unwrap_or_else(|_| CellValue::Text(raw.to_string())),
        // NaN / inf literals only become floats inside an all-numeric column
        CsvType::Float => value
            .parse::<f64>()
            .map(CellValue::Float)
            .unwrap_or_else(|_| CellValue::Text(raw.to_string())),
        CsvType::Bool => CellValue::Bool(value.eq_ignore_ascii_case("true")),
        CsvType::Text => CellValue::Text(raw.to_string()),
    }
}
