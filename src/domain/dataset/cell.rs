// ============================================================
// CELL VALUES
// ============================================================

use chrono::NaiveDateTime;

/// A single cell as loaded from the source file.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Empty cell, error cell, or a value that was dropped during sanitization
    Missing,
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Text(String),
}

impl CellValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Missing cells and non-finite floats both count as "null-like".
    pub fn is_null_like(&self) -> bool {
        match self {
            CellValue::Missing => true,
            CellValue::Float(v) => !v.is_finite(),
            _ => false,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

