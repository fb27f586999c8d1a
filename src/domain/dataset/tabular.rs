// ============================================================
// TABULAR DATASET
// ============================================================
// Ordered named columns of equal length

use super::{CellValue, ColumnKind};
use crate::domain::error::{AppError, Result};

/// A named column with a single inferred kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<CellValue>,
}

impl Column {
    /// Build a column, inferring its kind and coercing values to it.
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        let kind = ColumnKind::infer(&values);
        let values = values.into_iter().map(|v| kind.coerce(v)).collect();

        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    /// Build a column with an explicit kind. Values are kept as given.
    #[cfg(test)]
    pub fn with_kind(name: impl Into<String>, kind: ColumnKind, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TabularDataset {
    columns: Vec<Column>,
}

impl TabularDataset {
    /// Create a dataset. All columns must hold the same number of values.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
                return Err(AppError::ValidationError(format!(
                    "Column '{}' has {} values, expected {}",
                    bad.name,
                    bad.len(),
                    expected
                )));
            }
        }

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    #[cfg(test)]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Cells of one row, in column order.
    #[cfg(test)]
    pub fn row(&self, index: usize) -> Option<Vec<&CellValue>> {
        if index >= self.row_count() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[index]).collect())
    }

    /// One-line-per-column description used for load logging.
    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "{} rows x {} columns",
            self.row_count(),
            self.column_count()
        )];
        for column in &self.columns {
            let missing = column.values.iter().filter(|v| v.is_null_like()).count();
            lines.push(format!(
                "  {:<24} {:<16} missing={}",
                column.name, column.kind, missing
            ));
        }
        lines.join("\n")
    }
}
