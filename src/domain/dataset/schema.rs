// ============================================================
// REMOTE SCHEMA
// ============================================================
// Column schema and dataset definition sent to the push API

use serde::{Deserialize, Serialize};

/// Column data type tag understood by the remote dataset service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Int64,
    Double,
    DateTime,
    String,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Int64 => "Int64",
            DataType::Double => "Double",
            DataType::DateTime => "DateTime",
            DataType::String => "String",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Map a column type name to the remote data type.
///
/// Case-insensitive substring match, checked in order: `int`, `float`,
/// `datetime`. Everything else (booleans, text, mixed) falls back to `String`.
pub fn map_dtype(type_name: &str) -> DataType {
    let dtype = type_name.to_lowercase();
    if dtype.contains("int") {
        return DataType::Int64;
    }
    if dtype.contains("float") {
        return DataType::Double;
    }
    if dtype.contains("datetime") {
        return DataType::DateTime;
    }
    DataType::String
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: DataType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnSchema>,
}

/// Body of the "create dataset" request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetDefinition {
    pub name: String,
    pub default_mode: String,
    pub tables: Vec<TableDefinition>,
}

impl DatasetDefinition {
    pub const PUSH_MODE: &'static str = "Push";

    pub fn push(name: &str, table: TableDefinition) -> Self {
        Self {
            name: name.to_string(),
            default_mode: Self::PUSH_MODE.to_string(),
            tables: vec![table],
        }
    }
}
