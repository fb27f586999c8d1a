pub mod auth;
pub mod client;

use crate::domain::dataset::{DatasetDefinition, RowRecord};
use crate::domain::error::Result;
use crate::domain::push_config::ReportTemplate;
use async_trait::async_trait;

pub use auth::{AccessToken, ClientCredentialsProvider};
pub use client::PowerBiClient;

/// Exchanges service credentials for a bearer token.
#[async_trait]
pub trait TokenProvider {
    async fn access_token(&self) -> Result<AccessToken>;
}

/// The slice of the Power BI REST API the push pipeline talks to.
#[async_trait]
pub trait PowerBiApi {
    /// Create a push dataset and return the id the service assigned to it.
    async fn create_dataset(
        &self,
        token: &AccessToken,
        workspace_id: &str,
        definition: &DatasetDefinition,
    ) -> Result<String>;

    async fn push_rows(
        &self,
        token: &AccessToken,
        workspace_id: &str,
        dataset_id: &str,
        table_name: &str,
        rows: &[RowRecord],
    ) -> Result<()>;

    /// Clone the template report into `workspace_id`, bound to `dataset_id`.
    /// Returns the new report id.
    ///
    /// Any status other than 200 is a `RemoteServiceError`. A 200 whose body
    /// carries no `id` is a `ParseError`; the clone may still exist.
    async fn clone_report(
        &self,
        token: &AccessToken,
        template: &ReportTemplate,
        workspace_id: &str,
        dataset_id: &str,
    ) -> Result<String>;

    async fn rebind_report(
        &self,
        token: &AccessToken,
        workspace_id: &str,
        report_id: &str,
        dataset_id: &str,
    ) -> Result<()>;
}
