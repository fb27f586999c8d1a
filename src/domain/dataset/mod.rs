// ============================================================
// DATASET DOMAIN LAYER
// ============================================================
// Columnar tabular data, the remote column schema and the
// JSON-safe row records that get pushed.
// No I/O, no async.

mod cell;
mod column_kind;
mod record;
mod schema;
mod tabular;

pub use cell::CellValue;
pub use column_kind::ColumnKind;
pub use record::{RowRecord, SanitizedValue};
pub use schema::{map_dtype, ColumnSchema, DatasetDefinition, TableDefinition};
pub use tabular::{Column, TabularDataset};

#[cfg(test)]
pub use schema::DataType;
