use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::application::{prepare, PreparedPush, PushDatasetUseCase, PushPlan};
use crate::domain::error::{AppError, Result};
use crate::domain::push_config::PushConfig;
use crate::domain::push_summary::PushSummary;
use crate::infrastructure::config::ConfigService;
use crate::infrastructure::powerbi::{ClientCredentialsProvider, PowerBiClient};
use crate::interfaces::cli::Cli;

const PREVIEW_ROWS: usize = 5;

#[derive(Debug)]
pub enum RunOutcome {
    DryRun(PreparedPush),
    Pushed(PushSummary),
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref())?;

    let config = ConfigService::new()
        .with_config_file(cli.config.as_deref())
        .load(&cli.overrides())?;
    info!(?config, "Configuration loaded");

    match run_pipeline(&config, cli.dry_run).await {
        Ok(outcome) => print_outcome(&outcome),
        Err(e) => {
            error!(error = %e, "Pipeline failed");
            Err(e)
        }
    }
}

fn init_tracing(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).map_err(|e| {
            AppError::ConfigurationError(format!("Invalid log level '{}': {}", level, e))
        })?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    Ok(())
}

/// Validate `config`, then either dry-run locally or push to Power BI.
///
/// Configuration problems surface here before any file or network access.
pub async fn run_pipeline(config: &PushConfig, dry_run: bool) -> Result<RunOutcome> {
    let plan = PushPlan::from_config(config)?;

    if dry_run {
        info!("Dry run, Power BI will not be contacted");
        return prepare(&plan).map(RunOutcome::DryRun);
    }

    let use_case = PushDatasetUseCase::new(
        Arc::new(ClientCredentialsProvider::from_config(config)?),
        Arc::new(PowerBiClient::from_config(config)?),
    );
    use_case.execute(&plan).await.map(RunOutcome::Pushed)
}

fn print_outcome(outcome: &RunOutcome) -> Result<()> {
    match outcome {
        RunOutcome::Pushed(summary) => println!("{}", summary),
        RunOutcome::DryRun(prepared) => {
            let preview = serde_json::json!({
                "dataset": prepared.definition,
                "rowCount": prepared.records.len(),
                "preview": prepared.records.iter().take(PREVIEW_ROWS).collect::<Vec<_>>(),
            });
            let text = serde_json::to_string_pretty(&preview)
                .map_err(|e| AppError::Internal(format!("Failed to render preview: {}", e)))?;
            println!("{}", text);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config_with_source(source: PathBuf) -> PushConfig {
        PushConfig {
            tenant_id: Some("tenant".to_string()),
            client_id: Some("client".to_string()),
            client_secret: Some("secret".to_string()),
            workspace_id: Some("ws".to_string()),
            source_path: Some(source),
            // nothing listens here; a dry run must not notice
            api_root: "http://127.0.0.1:9/v1.0/myorg".to_string(),
            authority_host: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_missing_secret_fails_before_file_access() {
        let mut config = config_with_source(PathBuf::from("/definitely/not/here.xlsx"));
        config.client_secret = Some("   ".to_string());

        match run_pipeline(&config, false).await {
            Err(AppError::ConfigurationError(msg)) => {
                assert!(msg.contains("POWERBI_CLIENT_SECRET"))
            }
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dry_run_skips_network() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");
        std::fs::write(&path, "order,amount\nA-1,10\nA-2,\n").unwrap();

        let outcome = run_pipeline(&config_with_source(path), true).await.unwrap();
        let RunOutcome::DryRun(prepared) = outcome else {
            panic!("expected a dry run");
        };
        assert_eq!(prepared.records.len(), 2);
        assert!(prepared.records[1].get("amount").unwrap().is_null());
        assert!(print_outcome(&RunOutcome::DryRun(prepared)).is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        assert!(matches!(
            init_tracing(Some("powerpush=loud")),
            Err(AppError::ConfigurationError(_))
        ));
    }
}
