use crate::domain::dataset::{
    map_dtype, ColumnSchema, DatasetDefinition, TableDefinition, TabularDataset,
};

/// One schema entry per column, in column order. Never fails: anything the
/// type mapping does not recognise becomes `String`.
pub fn infer_schema(dataset: &TabularDataset) -> Vec<ColumnSchema> {
    dataset
        .columns()
        .iter()
        .map(|column| ColumnSchema {
            name: column.name.clone(),
            data_type: map_dtype(column.kind.dtype_name()),
        })
        .collect()
}

/// Push dataset definition holding a single table described by `dataset`.
pub fn build_dataset_definition(
    dataset_name: &str,
    table_name: &str,
    dataset: &TabularDataset,
) -> DatasetDefinition {
    DatasetDefinition::push(
        dataset_name,
        TableDefinition {
            name: table_name.to_string(),
            columns: infer_schema(dataset),
        },
    )
}
