use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};

use super::models::{PricePage, SkuCatalogPage, SkuRecord};
use crate::error::{ImporterError, Result};

const SKU_API_VERSION: &str = "2024-07-01";

/// HTTP access to the retail prices and Resource Manager SKU endpoints.
///
/// Errors are returned as-is; nothing here retries.
#[derive(Debug, Clone)]
pub struct AzureClient {
    client: reqwest::Client,
    management_api_url: String,
}

impl AzureClient {
    pub fn new(management_api_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pricing-importer/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self::with_client(client, management_api_url))
    }

    pub fn with_client(client: reqwest::Client, management_api_url: impl Into<String>) -> Self {
        Self {
            client,
            management_api_url: management_api_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.client
    }

    /// GETs `url` and parses the body as JSON.
    pub async fn fetch_json(&self, url: &str, bearer_token: Option<&str>) -> Result<Value> {
        let mut request = self.client.get(url);
        if let Some(token) = bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ImporterError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    pub async fn fetch_price_page(&self, url: &str) -> Result<PricePage> {
        debug!("Fetching price page: {}", url);
        let document = self.fetch_json(url, None).await?;
        PricePage::from_json(document)
    }

    pub fn sku_catalog_url(&self, subscription_id: &str) -> String {
        format!(
            "{}/subscriptions/{}/providers/Microsoft.Compute/skus?api-version={}",
            self.management_api_url, subscription_id, SKU_API_VERSION
        )
    }

    /// Fetches the whole SKU catalog for a subscription, following `nextLink`.
    pub async fn fetch_sku_catalog(
        &self,
        subscription_id: &str,
        bearer_token: &str,
    ) -> Result<Vec<SkuRecord>> {
        let mut records = Vec::new();
        let mut next_url = Some(self.sku_catalog_url(subscription_id));
        let mut pages = 0usize;

        while let Some(url) = next_url.take() {
            debug!("Fetching SKU catalog page: {}", url);
            let document = self.fetch_json(&url, Some(bearer_token)).await?;
            let page = SkuCatalogPage::from_json(document)?;

            pages += 1;
            records.extend(page.records);
            next_url = page.next_link;
        }

        info!("Fetched {} SKU records in {} page(s)", records.len(), pages);
        Ok(records)
    }
}
