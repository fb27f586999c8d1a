use crate::infrastructure::config::ConfigOverrides;
use clap::Parser;
use std::path::PathBuf;

/// Push a spreadsheet into a Power BI push dataset and attach a report to it.
#[derive(Parser, Debug)]
#[command(name = "powerpush", version, about, long_about = None)]
pub struct Cli {
    /// Source file (.xlsx, .xlsm, .xlsb, .xls, .ods or .csv)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Worksheet name (defaults to the first sheet)
    #[arg(short, long)]
    pub sheet: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Target workspace id
    #[arg(short, long)]
    pub workspace: Option<String>,

    /// Name of the dataset to create
    #[arg(long)]
    pub dataset_name: Option<String>,

    /// Name of the table inside the dataset
    #[arg(long)]
    pub table_name: Option<String>,

    /// Skip cloning the report template
    #[arg(long)]
    pub no_report: bool,

    /// Read and sanitize only; print the schema and a preview without calling Power BI
    #[arg(long)]
    pub dry_run: bool,

    /// Log filter, e.g. info, debug, powerpush_lib=trace (RUST_LOG otherwise)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            source_path: self.file.clone(),
            sheet: self.sheet.clone(),
            workspace_id: self.workspace.clone(),
            dataset_name: self.dataset_name.clone(),
            table_name: self.table_name.clone(),
            no_report: self.no_report,
        }
    }
}
