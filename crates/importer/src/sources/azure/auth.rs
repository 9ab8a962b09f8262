use serde::Deserialize;
use tracing::info;

use crate::error::{ImporterError, Result};

pub const MANAGEMENT_SCOPE: &str = "https://management.azure.com/.default";

/// Service principal credentials for the client-credentials grant
#[derive(Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

impl ClientCredentials {
    /// Builds credentials from optional parts, naming every missing variable.
    pub fn from_parts(
        client_id: Option<String>,
        client_secret: Option<String>,
        tenant_id: Option<String>,
    ) -> Result<Self> {
        let present =
            |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());

        let missing: Vec<&str> = [
            ("AZURE_CLIENT_ID", present(&client_id)),
            ("AZURE_CLIENT_SECRET", present(&client_secret)),
            ("AZURE_TENANT_ID", present(&tenant_id)),
        ]
        .into_iter()
        .filter_map(|(name, ok)| (!ok).then_some(name))
        .collect();

        match (client_id, client_secret, tenant_id) {
            (Some(client_id), Some(client_secret), Some(tenant_id)) if missing.is_empty() => {
                Ok(Self {
                    client_id,
                    client_secret,
                    tenant_id,
                })
            }
            _ => Err(ImporterError::AuthError(format!(
                "missing required credentials: {}",
                missing.join(", ")
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Exchanges client credentials for a Resource Manager bearer token.
pub struct TokenProvider {
    client: reqwest::Client,
    login_url: String,
}

impl TokenProvider {
    pub fn new(client: reqwest::Client, login_url: impl Into<String>) -> Self {
        Self {
            client,
            login_url: login_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn token_url(&self, tenant_id: &str) -> String {
        format!("{}/{}/oauth2/v2.0/token", self.login_url, tenant_id)
    }

    /// Any failure here, transport included, is reported as `AuthError`.
    pub async fn fetch_token(&self, credentials: &ClientCredentials) -> Result<String> {
        let form = [
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("grant_type", "client_credentials"),
            ("scope", MANAGEMENT_SCOPE),
        ];

        let response = self
            .client
            .post(self.token_url(&credentials.tenant_id))
            .form(&form[..])
            .send()
            .await
            .map_err(|e| ImporterError::AuthError(format!("token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImporterError::AuthError(format!(
                "token endpoint returned {}: {}",
                status.as_u16(),
                body
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            ImporterError::AuthError(format!("failed to decode token response: {}", e))
        })?;

        let access_token = token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ImporterError::AuthError("access_token not found in response".to_string())
            })?;

        info!("Obtained management API token for tenant {}", credentials.tenant_id);
        Ok(access_token)
    }
}
