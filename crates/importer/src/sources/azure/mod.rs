mod auth;
mod capabilities;
mod client;
mod matcher;
mod models;
mod pipeline;

pub use auth::{ClientCredentials, MANAGEMENT_SCOPE, TokenProvider};
pub use capabilities::SkuCapabilities;
pub use client::AzureClient;
pub use matcher::SkuCatalog;
pub use models::*;
pub use pipeline::{ImportMode, ImportOrchestrator, ImportSummary, ItemOutcome};

use crate::{ImportContext, ImporterError, Result, traits::CatalogImporter};
use tracing::{info, warn};

/// Imports providers, regions and services referenced by the retail prices feed.
pub struct PriceImporter {
    client: AzureClient,
}

impl PriceImporter {
    pub fn new(client: AzureClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl CatalogImporter for PriceImporter {
    async fn import(&self, context: &ImportContext<'_>) -> Result<ImportSummary> {
        info!("Importing price data from {}", context.settings.price_api_url);

        ImportOrchestrator::new(&self.client, context.store, context.settings)
            .run(&context.settings.price_api_url, ImportMode::EntitiesOnly)
            .await
    }

    fn name(&self) -> &'static str {
        "Azure retail prices"
    }
}

/// Joins the retail prices feed with the subscription's SKU catalog and
/// stores one SKU row per matched price item.
pub struct SkuImporter {
    client: AzureClient,
    tokens: TokenProvider,
    credentials: ClientCredentials,
    subscription_id: String,
}

impl SkuImporter {
    pub fn new(
        client: AzureClient,
        tokens: TokenProvider,
        credentials: ClientCredentials,
        subscription_id: impl Into<String>,
    ) -> Result<Self> {
        let subscription_id = subscription_id.into();
        if subscription_id.trim().is_empty() {
            return Err(ImporterError::ValidationError(
                "subscription ID not found (set AZURE_SUBSCRIPTION_ID)".to_string(),
            ));
        }

        Ok(Self {
            client,
            tokens,
            credentials,
            subscription_id,
        })
    }
}

#[async_trait::async_trait]
impl CatalogImporter for SkuImporter {
    async fn import(&self, context: &ImportContext<'_>) -> Result<ImportSummary> {
        let token = self.tokens.fetch_token(&self.credentials).await?;

        let records = self
            .client
            .fetch_sku_catalog(&self.subscription_id, &token)
            .await?;
        let catalog = SkuCatalog::new(records);
        if catalog.is_empty() {
            warn!("SKU catalog is empty; every price item will be skipped");
        }

        info!(
            "Importing SKU data for {} catalog entries from {}",
            catalog.len(),
            context.settings.price_api_url
        );

        ImportOrchestrator::new(&self.client, context.store, context.settings)
            .run(&context.settings.price_api_url, ImportMode::WithSkus(&catalog))
            .await
    }

    fn name(&self) -> &'static str {
        "Azure SKU catalog"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImportSettings;
    use serde_json::json;
    use std::time::Duration;
    use storage::InMemoryCatalogStore;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> ClientCredentials {
        ClientCredentials {
            client_id: "client-1".to_string(),
            client_secret: "secret-1".to_string(),
            tenant_id: "tenant-1".to_string(),
        }
    }

    fn settings_for(server: &MockServer) -> ImportSettings {
        ImportSettings {
            price_api_url: format!("{}/api/retail/prices", server.uri()),
            management_api_url: server.uri(),
            login_url: server.uri(),
            batch_pause: Duration::ZERO,
            ..Default::default()
        }
    }

    fn sku_importer(settings: &ImportSettings) -> SkuImporter {
        let client = AzureClient::new(settings.management_api_url.as_str()).unwrap();
        let tokens = TokenProvider::new(client.http().clone(), settings.login_url.as_str());
        SkuImporter::new(client, tokens, credentials(), "sub-1").unwrap()
    }

    async fn mount_price_page(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/retail/prices"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Items": [{
                    "armRegionName": "eastus",
                    "location": "US East",
                    "armSkuName": "Standard_D2s_v3",
                    "type": "Consumption"
                }],
                "NextPageLink": null
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_sku_import_end_to_end() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tenant-1/oauth2/v2.0/token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "access_token": "token-abc" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/subscriptions/sub-1/providers/Microsoft.Compute/skus"))
            .and(header("Authorization", "Bearer token-abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [{
                    "name": "Standard_D2s_v3",
                    "size": "D2s_v3",
                    "capabilities": [
                        { "name": "vCPUs", "value": "2" },
                        { "name": "MemoryGB", "value": "8" }
                    ]
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        mount_price_page(&server).await;

        let settings = settings_for(&server);
        let store = InMemoryCatalogStore::new();
        let context = ImportContext {
            store: &store,
            settings: &settings,
        };

        let summary = sku_importer(&settings).import(&context).await.unwrap();

        assert_eq!(summary.skus_created, 1);
        assert_eq!(store.providers()[0].provider_name, "Azure");
        assert_eq!(store.regions()[0].region_code, "eastus");
        assert_eq!(store.regions()[0].region_name, "US East");
        assert_eq!(store.services()[0].service_name, "Virtual Machines");
        assert_eq!(store.skus()[0].v_cpus, 2);
        assert_eq!(store.skus()[0].memory_gb, "8");
    }

    #[tokio::test]
    async fn test_token_failure_stops_before_pagination() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("AADSTS7000215"))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Items": [] })))
            .expect(0)
            .mount(&server)
            .await;

        let settings = settings_for(&server);
        let store = InMemoryCatalogStore::new();
        let context = ImportContext {
            store: &store,
            settings: &settings,
        };

        let err = sku_importer(&settings).import(&context).await.unwrap_err();

        assert!(matches!(err, ImporterError::AuthError(_)));
        assert!(store.providers().is_empty());
    }

    #[tokio::test]
    async fn test_price_import_resolves_entities_only() {
        let server = MockServer::start().await;
        mount_price_page(&server).await;

        let settings = settings_for(&server);
        let store = InMemoryCatalogStore::new();
        let context = ImportContext {
            store: &store,
            settings: &settings,
        };

        let importer = PriceImporter::new(AzureClient::new(server.uri()).unwrap());
        let summary = importer.import(&context).await.unwrap();

        assert_eq!(summary.items, 1);
        assert_eq!(store.providers().len(), 1);
        assert_eq!(store.regions().len(), 1);
        assert_eq!(store.services().len(), 1);
        assert!(store.skus().is_empty());
    }

    #[test]
    fn test_blank_subscription_is_rejected() {
        let client = AzureClient::new("https://management.azure.com").unwrap();
        let tokens = TokenProvider::new(client.http().clone(), "https://login.microsoftonline.com");

        let result = SkuImporter::new(client, tokens, credentials(), "  ");
        assert!(matches!(result, Err(ImporterError::ValidationError(_))));
    }
}
