use super::TokenProvider;
use crate::domain::error::{AppError, Result};
use crate::domain::push_config::{Credentials, PushConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Bearer token for the Power BI API. Never printed.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken([REDACTED])")
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
    error: Option<String>,
    error_description: Option<String>,
}

/// OAuth2 client credentials flow against the Microsoft identity platform.
pub struct ClientCredentialsProvider {
    client: Client,
    token_url: Url,
    credentials: Credentials,
    scope: String,
}

impl ClientCredentialsProvider {
    pub fn new(
        authority_host: &str,
        credentials: Credentials,
        scope: &str,
        timeout_secs: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let mut token_url = Url::parse(authority_host).map_err(|e| {
            AppError::ConfigurationError(format!(
                "Invalid authority_host '{}': {}",
                authority_host, e
            ))
        })?;
        // {authority_host}/{tenant}/oauth2/v2.0/token, tenant percent-encoded
        token_url
            .path_segments_mut()
            .map_err(|_| {
                AppError::ConfigurationError(format!(
                    "authority_host '{}' cannot be used as a base URL",
                    authority_host
                ))
            })?
            .pop_if_empty()
            .extend([credentials.tenant_id.as_str(), "oauth2", "v2.0", "token"]);

        Ok(Self {
            client,
            token_url,
            credentials,
            scope: scope.to_string(),
        })
    }

    pub fn from_config(config: &PushConfig) -> Result<Self> {
        Self::new(
            &config.authority_host,
            config.credentials()?,
            &config.scope,
            config.timeout_secs,
        )
    }

    #[cfg(test)]
    pub fn token_url(&self) -> &str {
        self.token_url.as_str()
    }
}

#[async_trait]
impl TokenProvider for ClientCredentialsProvider {
    async fn access_token(&self) -> Result<AccessToken> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("scope", self.scope.as_str()),
        ];

        let response = self
            .client
            .post(self.token_url.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::AuthError(format!("Token request failed: {}", e)))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        let parsed: Option<TokenResponse> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            let detail = parsed
                .and_then(|p| match (p.error, p.error_description) {
                    (Some(code), Some(desc)) => Some(format!("{}: {}", code, desc)),
                    (Some(code), None) => Some(code),
                    (None, desc) => desc,
                })
                .unwrap_or(text);
            return Err(AppError::AuthError(format!(
                "Token endpoint returned {}: {}",
                status, detail
            )));
        }

        let parsed = parsed.ok_or_else(|| {
            AppError::AuthError("Token endpoint returned an unreadable body".to_string())
        })?;

        let token = parsed.access_token.filter(|t| !t.is_empty()).ok_or_else(|| {
            AppError::AuthError("Token response has no access_token".to_string())
        })?;

        debug!(expires_in = ?parsed.expires_in, "Access token acquired");
        Ok(AccessToken::new(token))
    }
}
