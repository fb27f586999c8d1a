use super::{AccessToken, PowerBiApi};
use crate::domain::dataset::{DatasetDefinition, RowRecord};
use crate::domain::error::{AppError, Result};
use crate::domain::push_config::{PushConfig, ReportTemplate};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;
use url::Url;

#[derive(Deserialize)]
struct IdResponse {
    id: String,
}

#[derive(Serialize)]
struct RowsPayload<'a> {
    rows: &'a [RowRecord],
}

pub struct PowerBiClient {
    client: Client,
    api_root: Url,
}

impl PowerBiClient {
    pub fn new(api_root: &str, timeout_secs: u64) -> Result<Self> {
        let api_root = Url::parse(api_root).map_err(|e| {
            AppError::ConfigurationError(format!("Invalid api_root '{}': {}", api_root, e))
        })?;
        if api_root.cannot_be_a_base() {
            return Err(AppError::ConfigurationError(format!(
                "api_root '{}' cannot be used as a base URL",
                api_root
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, api_root })
    }

    pub fn from_config(config: &PushConfig) -> Result<Self> {
        Self::new(&config.api_root, config.timeout_secs)
    }

    /// `api_root` joined with percent-encoded path segments.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_root.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        token: &AccessToken,
        url: Url,
        body: &T,
    ) -> Result<Response> {
        debug!(url = %url, "POST");
        self.client
            .post(url.clone())
            .bearer_auth(token.secret())
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::NetworkError(format!("Request to {} failed: {}", url, e)))
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(AppError::RemoteServiceError {
        status: status.as_u16(),
        body,
    })
}

async fn read_id(response: Response) -> Result<String> {
    let parsed: IdResponse = response
        .json()
        .await
        .map_err(|e| AppError::ParseError(format!("Response has no usable id: {}", e)))?;
    Ok(parsed.id)
}

#[async_trait]
impl PowerBiApi for PowerBiClient {
    async fn create_dataset(
        &self,
        token: &AccessToken,
        workspace_id: &str,
        definition: &DatasetDefinition,
    ) -> Result<String> {
        let url = self.endpoint(&["groups", workspace_id, "datasets"]);
        let response = ensure_success(self.post_json(token, url, definition).await?).await?;
        read_id(response).await
    }

    async fn push_rows(
        &self,
        token: &AccessToken,
        workspace_id: &str,
        dataset_id: &str,
        table_name: &str,
        rows: &[RowRecord],
    ) -> Result<()> {
        let url = self.endpoint(&[
            "groups",
            workspace_id,
            "datasets",
            dataset_id,
            "tables",
            table_name,
            "rows",
        ]);
        ensure_success(self.post_json(token, url, &RowsPayload { rows }).await?).await?;
        Ok(())
    }

    async fn clone_report(
        &self,
        token: &AccessToken,
        template: &ReportTemplate,
        workspace_id: &str,
        dataset_id: &str,
    ) -> Result<String> {
        let url = self.endpoint(&[
            "groups",
            &template.workspace_id,
            "reports",
            &template.report_id,
            "Clone",
        ]);
        let body = json!({
            "name": template.report_name,
            "targetWorkspaceId": workspace_id,
            "targetModelId": dataset_id,
        });

        let response = self.post_json(token, url, &body).await?;
        // anything but a plain 200 counts as a failed clone
        if response.status() != StatusCode::OK {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::RemoteServiceError { status, body });
        }
        read_id(response).await
    }

    async fn rebind_report(
        &self,
        token: &AccessToken,
        workspace_id: &str,
        report_id: &str,
        dataset_id: &str,
    ) -> Result<()> {
        let url = self.endpoint(&["groups", workspace_id, "reports", report_id, "Rebind"]);
        let body = json!({ "datasetId": dataset_id });
        ensure_success(self.post_json(token, url, &body).await?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::{ColumnSchema, DataType, SanitizedValue, TableDefinition};
    use crate::interfaces::mock_server::{MockRoute, MockServer};

    fn token() -> AccessToken {
        AccessToken::new("tok-abc")
    }

    fn definition() -> DatasetDefinition {
        DatasetDefinition::push(
            "Excel_Push_Dataset",
            TableDefinition {
                name: "MainTable".to_string(),
                columns: vec![ColumnSchema {
                    name: "id".to_string(),
                    data_type: DataType::Int64,
                }],
            },
        )
    }

    fn template() -> ReportTemplate {
        ReportTemplate {
            workspace_id: "tws".to_string(),
            report_id: "trep".to_string(),
            report_name: "blankreport_withdataset".to_string(),
        }
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = PowerBiClient::new("https://api.powerbi.com/v1.0/myorg/", 5).unwrap();
        let url = client.endpoint(&["groups", "ws", "datasets", "d1", "tables", "Main Table", "rows"]);
        assert_eq!(
            url.as_str(),
            "https://api.powerbi.com/v1.0/myorg/groups/ws/datasets/d1/tables/Main%20Table/rows"
        );

        let client = PowerBiClient::new("https://api.powerbi.com/v1.0/myorg", 5).unwrap();
        let url = client.endpoint(&["groups", "ws", "datasets"]);
        assert_eq!(url.as_str(), "https://api.powerbi.com/v1.0/myorg/groups/ws/datasets");
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(matches!(
            PowerBiClient::new("mailto:someone@example.com", 5),
            Err(AppError::ConfigurationError(_))
        ));
    }

    #[tokio::test]
    async fn test_create_dataset_posts_definition() {
        let server = MockServer::start(vec![MockRoute::post(
            "/v1.0/myorg/groups/ws/datasets",
            201,
            r#"{"id":"ds-1","name":"Excel_Push_Dataset"}"#,
        )])
        .await
        .unwrap();

        let client = PowerBiClient::new(&server.url("/v1.0/myorg"), 5).unwrap();
        let id = client.create_dataset(&token(), "ws", &definition()).await.unwrap();
        assert_eq!(id, "ds-1");

        let requests = server.requests_to("/v1.0/myorg/groups/ws/datasets");
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].headers.get("authorization").map(String::as_str),
            Some("Bearer tok-abc")
        );
        let body = requests[0].json();
        assert_eq!(body["defaultMode"], "Push");
        assert_eq!(body["tables"][0]["columns"][0]["dataType"], "Int64");

        server.stop().await;
    }

    #[tokio::test]
    async fn test_create_dataset_failure_keeps_status_and_body() {
        let server = MockServer::start(vec![MockRoute::post(
            "/groups/ws/datasets",
            403,
            r#"{"error":{"code":"PowerBINotAuthorizedException"}}"#,
        )])
        .await
        .unwrap();

        let client = PowerBiClient::new(&server.url(""), 5).unwrap();
        match client.create_dataset(&token(), "ws", &definition()).await {
            Err(AppError::RemoteServiceError { status, body }) => {
                assert_eq!(status, 403);
                assert!(body.contains("PowerBINotAuthorizedException"));
            }
            other => panic!("expected remote error, got {:?}", other),
        }

        server.stop().await;
    }

    #[tokio::test]
    async fn test_push_rows_wraps_records() {
        let server = MockServer::start(vec![MockRoute::post(
            "/groups/ws/datasets/ds-1/tables/MainTable/rows",
            200,
            "{}",
        )])
        .await
        .unwrap();

        let mut record = RowRecord::default();
        record.push("id", SanitizedValue::from(7i64));
        record.push("note", SanitizedValue::Null);

        let client = PowerBiClient::new(&server.url(""), 5).unwrap();
        client
            .push_rows(&token(), "ws", "ds-1", "MainTable", &[record])
            .await
            .unwrap();

        let requests = server.requests_to("/groups/ws/datasets/ds-1/tables/MainTable/rows");
        assert_eq!(
            requests[0].json(),
            serde_json::json!({"rows": [{"id": 7, "note": null}]})
        );

        server.stop().await;
    }

    #[tokio::test]
    async fn test_clone_requires_exact_200() {
        let server = MockServer::start(vec![MockRoute::post(
            "/groups/tws/reports/trep/Clone",
            202,
            r#"{"id":"rep-9"}"#,
        )])
        .await
        .unwrap();

        let client = PowerBiClient::new(&server.url(""), 5).unwrap();
        let result = client.clone_report(&token(), &template(), "ws", "ds-1").await;
        assert!(matches!(
            result,
            Err(AppError::RemoteServiceError { status: 202, .. })
        ));

        let body = server.requests_to("/groups/tws/reports/trep/Clone")[0].json();
        assert_eq!(body["targetWorkspaceId"], "ws");
        assert_eq!(body["targetModelId"], "ds-1");
        assert_eq!(body["name"], "blankreport_withdataset");

        server.stop().await;
    }

    #[tokio::test]
    async fn test_clone_ok_without_id_is_parse_error() {
        let server = MockServer::start(vec![MockRoute::post(
            "/groups/tws/reports/trep/Clone",
            200,
            r#"{"name":"blankreport_withdataset"}"#,
        )])
        .await
        .unwrap();

        let client = PowerBiClient::new(&server.url(""), 5).unwrap();
        let result = client.clone_report(&token(), &template(), "ws", "ds-1").await;
        assert!(matches!(result, Err(AppError::ParseError(_))));

        server.stop().await;
    }

    #[tokio::test]
    async fn test_clone_and_rebind() {
        let server = MockServer::start(vec![
            MockRoute::post("/groups/tws/reports/trep/Clone", 200, r#"{"id":"rep-9"}"#),
            MockRoute::post("/groups/ws/reports/rep-9/Rebind", 200, ""),
        ])
        .await
        .unwrap();

        let client = PowerBiClient::new(&server.url(""), 5).unwrap();
        let report_id = client
            .clone_report(&token(), &template(), "ws", "ds-1")
            .await
            .unwrap();
        assert_eq!(report_id, "rep-9");

        client
            .rebind_report(&token(), "ws", &report_id, "ds-1")
            .await
            .unwrap();
        let body = server.requests_to("/groups/ws/reports/rep-9/Rebind")[0].json();
        assert_eq!(body, serde_json::json!({"datasetId": "ds-1"}));

        server.stop().await;
    }
}
