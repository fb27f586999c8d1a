// ============================================================
// COLUMN KIND
// ============================================================
// The uniform primitive type a column is loaded as

use super::CellValue;
use serde::{Deserialize, Serialize};

/// Inferred primitive type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Int64,
    Float64,
    Boolean,
    DateTime,
    /// Text cells only (missing allowed)
    Text,
    /// Anything heterogeneous, e.g. numbers mixed with text
    Mixed,
}

impl ColumnKind {
    /// Type name used by the schema type-mapping policy.
    pub fn dtype_name(&self) -> &'static str {
        match self {
            ColumnKind::Int64 => "int64",
            ColumnKind::Float64 => "float64",
            ColumnKind::Boolean => "bool",
            ColumnKind::DateTime => "datetime64[ns]",
            ColumnKind::Text => "string",
            ColumnKind::Mixed => "object",
        }
    }

    /// Infer the kind of a column from its cells.
    ///
    /// Integers only stay `Int64` when no cell is missing, otherwise the column
    /// widens to `Float64` the same way booleans with gaps widen to `Mixed`.
    /// A column with no values at all is `Float64`.
    pub fn infer(values: &[CellValue]) -> Self {
        let mut has_missing = false;
        let mut ints = 0usize;
        let mut floats = 0usize;
        let mut bools = 0usize;
        let mut dates = 0usize;
        let mut texts = 0usize;

        for value in values {
            match value {
                CellValue::Missing => has_missing = true,
                CellValue::Int(_) => ints += 1,
                CellValue::Float(_) => floats += 1,
                CellValue::Bool(_) => bools += 1,
                CellValue::DateTime(_) => dates += 1,
                CellValue::Text(_) => texts += 1,
            }
        }

        let present = ints + floats + bools + dates + texts;
        if present == 0 {
            return ColumnKind::Float64;
        }

        if ints == present {
            if has_missing {
                ColumnKind::Float64
            } else {
                ColumnKind::Int64
            }
        } else if ints + floats == present {
            ColumnKind::Float64
        } else if bools == present {
            if has_missing {
                ColumnKind::Mixed
            } else {
                ColumnKind::Boolean
            }
        } else if dates == present {
            ColumnKind::DateTime
        } else if texts == present {
            ColumnKind::Text
        } else {
            ColumnKind::Mixed
        }
    }

    /// Coerce a cell so it matches this kind. Only numeric widening applies.
    pub fn coerce(&self, value: CellValue) -> CellValue {
        match (self, value) {
            (ColumnKind::Float64, CellValue::Int(v)) => CellValue::Float(v as f64),
            (_, value) => value,
        }
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dtype_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> CellValue {
        CellValue::DateTime(
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn test_infer_integers() {
        let values = vec![CellValue::Int(1), CellValue::Int(2)];
        assert_eq!(ColumnKind::infer(&values), ColumnKind::Int64);
    }

    #[test]
    fn test_integers_with_gap_widen_to_float() {
        let values = vec![CellValue::Int(1), CellValue::Missing];
        assert_eq!(ColumnKind::infer(&values), ColumnKind::Float64);
    }

    #[test]
    fn test_infer_mixed_numbers() {
        let values = vec![CellValue::Int(1), CellValue::Float(2.5)];
        assert_eq!(ColumnKind::infer(&values), ColumnKind::Float64);
    }

    #[test]
    fn test_infer_datetime_with_gap() {
        let values = vec![ts(), CellValue::Missing];
        assert_eq!(ColumnKind::infer(&values), ColumnKind::DateTime);
    }

    #[test]
    fn test_infer_booleans() {
        let values = vec![CellValue::Bool(true), CellValue::Bool(false)];
        assert_eq!(ColumnKind::infer(&values), ColumnKind::Boolean);

        let values = vec![CellValue::Bool(true), CellValue::Missing];
        assert_eq!(ColumnKind::infer(&values), ColumnKind::Mixed);
    }

    #[test]
    fn test_infer_text_and_mixed() {
        let values = vec![CellValue::from("Ann"), CellValue::Missing];
        assert_eq!(ColumnKind::infer(&values), ColumnKind::Text);

        let values = vec![CellValue::from("Ann"), CellValue::Int(3)];
        assert_eq!(ColumnKind::infer(&values), ColumnKind::Mixed);
    }

    #[test]
    fn test_all_missing_is_float() {
        let values = vec![CellValue::Missing, CellValue::Missing];
        assert_eq!(ColumnKind::infer(&values), ColumnKind::Float64);
        assert_eq!(ColumnKind::infer(&[]), ColumnKind::Float64);
    }

    #[test]
    fn test_coerce_only_widens_into_float() {
        assert_eq!(
            ColumnKind::Float64.coerce(CellValue::Int(3)),
            CellValue::Float(3.0)
        );
        assert_eq!(ColumnKind::Mixed.coerce(CellValue::Int(3)), CellValue::Int(3));
    }
}
