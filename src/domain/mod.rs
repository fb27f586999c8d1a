pub mod error;
pub mod push_config;
pub mod push_summary;

// Tabular data, schema and row records
pub mod dataset;
