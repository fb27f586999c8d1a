use crate::domain::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_API_ROOT: &str = "https://api.powerbi.com/v1.0/myorg";
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
pub const DEFAULT_SCOPE: &str = "https://analysis.windows.net/powerbi/api/.default";

/// Maximum rows the push API accepts in a single POST.
pub const MAX_ROWS_PER_REQUEST: usize = 10_000;

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PushConfig {
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub workspace_id: Option<String>,
    pub source_path: Option<PathBuf>,
    pub sheet: Option<String>,
    pub dataset_name: String,
    pub table_name: String,
    pub template_workspace_id: Option<String>,
    pub template_report_id: Option<String>,
    pub report_name: String,
    pub clone_report: bool,
    pub api_root: String,
    pub authority_host: String,
    pub scope: String,
    pub rows_per_request: usize,
    pub timeout_secs: u64,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            tenant_id: None,
            client_id: None,
            client_secret: None,
            workspace_id: None,
            source_path: None,
            sheet: None,
            dataset_name: "Excel_Push_Dataset".to_string(),
            table_name: "MainTable".to_string(),
            template_workspace_id: None,
            template_report_id: None,
            report_name: "blankreport_withdataset".to_string(),
            clone_report: true,
            api_root: DEFAULT_API_ROOT.to_string(),
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            rows_per_request: MAX_ROWS_PER_REQUEST,
            timeout_secs: 60,
        }
    }
}

/// Service principal credentials, only constructed once all three are present.
#[derive(Clone)]
pub struct Credentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Template report to clone next to the new dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTemplate {
    pub workspace_id: String,
    pub report_id: String,
    pub report_name: String,
}

fn required(value: &Option<String>, env_name: &str) -> Result<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::ConfigurationError(format!(
            "{} is not set",
            env_name
        ))),
    }
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl PushConfig {
    /// Credentials, or a configuration error naming the first missing variable.
    pub fn credentials(&self) -> Result<Credentials> {
        Ok(Credentials {
            tenant_id: required(&self.tenant_id, "POWERBI_TENANT_ID")?,
            client_id: required(&self.client_id, "POWERBI_CLIENT_ID")?,
            client_secret: required(&self.client_secret, "POWERBI_CLIENT_SECRET")?,
        })
    }

    pub fn workspace(&self) -> Result<String> {
        required(&self.workspace_id, "POWERBI_WORKSPACE_ID")
    }

    pub fn source(&self) -> Result<PathBuf> {
        self.source_path
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| {
                AppError::ConfigurationError(
                    "No source file given (use --file or POWERBI_SOURCE_PATH)".to_string(),
                )
            })
    }

    /// The report template, when cloning is enabled and both ids are configured.
    pub fn report_template(&self) -> Option<ReportTemplate> {
        if !self.clone_report {
            return None;
        }
        Some(ReportTemplate {
            workspace_id: optional(&self.template_workspace_id)?,
            report_id: optional(&self.template_report_id)?,
            report_name: self.report_name.clone(),
        })
    }

    /// Check everything a run needs before any file or network work starts.
    pub fn validate(&self) -> Result<()> {
        self.credentials()?;
        self.workspace()?;
        self.source()?;

        if self.dataset_name.trim().is_empty() {
            return Err(AppError::ConfigurationError(
                "dataset_name must not be empty".to_string(),
            ));
        }
        if self.table_name.trim().is_empty() {
            return Err(AppError::ConfigurationError(
                "table_name must not be empty".to_string(),
            ));
        }
        if self.rows_per_request == 0 || self.rows_per_request > MAX_ROWS_PER_REQUEST {
            return Err(AppError::ConfigurationError(format!(
                "rows_per_request must be between 1 and {}",
                MAX_ROWS_PER_REQUEST
            )));
        }

        for (field, value) in [
            ("api_root", &self.api_root),
            ("authority_host", &self.authority_host),
        ] {
            url::Url::parse(value).map_err(|e| {
                AppError::ConfigurationError(format!("Invalid {} '{}': {}", field, value, e))
            })?;
        }

        Ok(())
    }
}

impl fmt::Debug for PushConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushConfig")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("workspace_id", &self.workspace_id)
            .field("source_path", &self.source_path)
            .field("sheet", &self.sheet)
            .field("dataset_name", &self.dataset_name)
            .field("table_name", &self.table_name)
            .field("template_workspace_id", &self.template_workspace_id)
            .field("template_report_id", &self.template_report_id)
            .field("report_name", &self.report_name)
            .field("clone_report", &self.clone_report)
            .field("api_root", &self.api_root)
            .field("authority_host", &self.authority_host)
            .field("scope", &self.scope)
            .field("rows_per_request", &self.rows_per_request)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
