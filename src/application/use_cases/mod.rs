pub mod push_dataset;
pub mod row_sanitizer;
pub mod schema_inference;
