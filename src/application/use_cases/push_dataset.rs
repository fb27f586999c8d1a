//! Spreadsheet to Power BI push pipeline.
//!
//! authenticate -> read -> infer schema -> create dataset -> sanitize ->
//! push rows -> clone report -> rebind report
//!
//! Every step is fatal except the report clone/rebind, which only degrades
//! the outcome.

use crate::application::use_cases::row_sanitizer::sanitize;
use crate::application::use_cases::schema_inference::build_dataset_definition;
use crate::domain::dataset::{DatasetDefinition, RowRecord, TabularDataset};
use crate::domain::error::{AppError, Result};
use crate::domain::push_config::{PushConfig, ReportTemplate};
use crate::domain::push_summary::{CloneFailure, PushSummary, ReportOutcome};
use crate::infrastructure::powerbi::{AccessToken, PowerBiApi, TokenProvider};
use crate::infrastructure::spreadsheet::read_dataset;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Everything one run needs, checked up front.
#[derive(Debug, Clone)]
pub struct PushPlan {
    pub workspace_id: String,
    pub source_path: PathBuf,
    pub sheet: Option<String>,
    pub dataset_name: String,
    pub table_name: String,
    pub rows_per_request: usize,
    pub report: Option<ReportTemplate>,
}

impl PushPlan {
    pub fn from_config(config: &PushConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            workspace_id: config.workspace()?,
            source_path: config.source()?,
            sheet: config.sheet.clone(),
            dataset_name: config.dataset_name.clone(),
            table_name: config.table_name.clone(),
            rows_per_request: config.rows_per_request,
            report: config.report_template(),
        })
    }
}

/// Output of the local half of the pipeline.
#[derive(Debug, Clone)]
pub struct PreparedPush {
    pub definition: DatasetDefinition,
    pub records: Vec<RowRecord>,
}

/// Read the source, infer the schema and sanitize rows. No network.
pub fn prepare(plan: &PushPlan) -> Result<PreparedPush> {
    info!(path = %plan.source_path.display(), "Reading source file");
    let mut dataset = read_dataset(&plan.source_path, plan.sheet.as_deref())?;
    log_dataset(&dataset);

    if dataset.column_count() == 0 {
        return Err(AppError::ValidationError(format!(
            "{} has no columns",
            plan.source_path.display()
        )));
    }
    if dataset.is_empty() {
        warn!("Source has a header but no data rows, the dataset will be created empty");
    }

    // schema comes from the loaded kinds, before sanitization rewrites dates
    let definition = build_dataset_definition(&plan.dataset_name, &plan.table_name, &dataset);
    let records = sanitize(&mut dataset);

    Ok(PreparedPush {
        definition,
        records,
    })
}

fn log_dataset(dataset: &TabularDataset) {
    info!(
        rows = dataset.row_count(),
        columns = ?dataset.column_names(),
        "Source loaded"
    );
    info!("Dataset preview:\n{}", dataset.summary());
}

pub struct PushDatasetUseCase {
    token_provider: Arc<dyn TokenProvider + Send + Sync>,
    api: Arc<dyn PowerBiApi + Send + Sync>,
}

impl PushDatasetUseCase {
    pub fn new(
        token_provider: Arc<dyn TokenProvider + Send + Sync>,
        api: Arc<dyn PowerBiApi + Send + Sync>,
    ) -> Self {
        Self { token_provider, api }
    }

    pub async fn execute(&self, plan: &PushPlan) -> Result<PushSummary> {
        info!("Authenticating with Power BI");
        let token = self.token_provider.access_token().await?;
        info!("Authentication successful");

        let prepared = prepare(plan)?;

        info!(dataset = %plan.dataset_name, "Creating push dataset");
        let dataset_id = self
            .api
            .create_dataset(&token, &plan.workspace_id, &prepared.definition)
            .await?;
        info!(dataset_id = %dataset_id, "Dataset created");

        let batches = self.push_rows(&token, plan, &dataset_id, &prepared.records).await?;
        info!(rows = prepared.records.len(), batches, "Rows pushed");

        let report = match &plan.report {
            Some(template) => {
                self.clone_and_rebind(&token, template, &plan.workspace_id, &dataset_id)
                    .await
            }
            None => {
                debug!("No report template configured, skipping clone");
                ReportOutcome::Skipped
            }
        };

        Ok(PushSummary {
            dataset_id,
            rows_pushed: prepared.records.len(),
            batches,
            report,
        })
    }

    async fn push_rows(
        &self,
        token: &AccessToken,
        plan: &PushPlan,
        dataset_id: &str,
        records: &[RowRecord],
    ) -> Result<usize> {
        let total = records.len().div_ceil(plan.rows_per_request);

        for (index, chunk) in records.chunks(plan.rows_per_request).enumerate() {
            debug!(batch = index + 1, total, rows = chunk.len(), "Pushing rows");
            self.api
                .push_rows(token, &plan.workspace_id, dataset_id, &plan.table_name, chunk)
                .await?;
        }

        Ok(total)
    }

    async fn clone_and_rebind(
        &self,
        token: &AccessToken,
        template: &ReportTemplate,
        workspace_id: &str,
        dataset_id: &str,
    ) -> ReportOutcome {
        info!(template = %template.report_id, "Cloning template report");

        let report_id = match self
            .api
            .clone_report(token, template, workspace_id, dataset_id)
            .await
        {
            Ok(id) => id,
            Err(AppError::RemoteServiceError { status, body }) => {
                let failure = CloneFailure::from_response(status, &body);
                match &failure {
                    CloneFailure::Unsupported { .. } => warn!(
                        status,
                        body = %body,
                        "Clone not supported for this dataset, continuing without report"
                    ),
                    CloneFailure::Http { .. } => {
                        warn!(status, body = %body, "Clone failed, continuing without report")
                    }
                }
                return ReportOutcome::CloneFailed(failure);
            }
            Err(AppError::ParseError(detail)) => {
                warn!(
                    detail = %detail,
                    "Clone accepted without a readable report id, a report may exist in the workspace unbound"
                );
                return ReportOutcome::CloneUnconfirmed { detail };
            }
            Err(e) => {
                warn!(error = %e, "Clone failed, continuing without report");
                return ReportOutcome::CloneFailed(CloneFailure::Http {
                    status: None,
                    body: e.to_string(),
                });
            }
        };
        info!(report_id = %report_id, "Report cloned");

        let rebound = match self
            .api
            .rebind_report(token, workspace_id, &report_id, dataset_id)
            .await
        {
            Ok(()) => {
                info!("Report rebound");
                true
            }
            Err(e) => {
                warn!(error = %e, "Rebind failed, report keeps its clone binding");
                false
            }
        };

        ReportOutcome::Cloned { report_id, rebound }
    }
}
