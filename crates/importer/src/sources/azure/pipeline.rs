use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde_json::Value;
use storage::CatalogStore;
use storage::dto::{NewPrice, NewSku, NewTerm};
use storage::models::{Price, Sku};
use tracing::{debug, info, warn};

use super::capabilities::SkuCapabilities;
use super::client::AzureClient;
use super::matcher::SkuCatalog;
use super::models::{PriceItem, SkuKeys, SkuRecord};
use crate::config::ImportSettings;
use crate::error::{ItemError, Result};
use crate::resolver::{EntityKeys, EntityResolver, ResolvedEntities};

/// What to do with each price item once its entities are resolved
#[derive(Debug, Clone, Copy)]
pub enum ImportMode<'a> {
    /// Provider, region and service only
    EntitiesOnly,
    /// Also match against the catalog and insert a SKU (plus price/term)
    WithSkus(&'a SkuCatalog),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    EntitiesResolved,
    SkuCreated { prices: usize, terms: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub pages: usize,
    pub items: usize,
    pub skipped: usize,
    pub skus_created: usize,
    pub prices_created: usize,
    pub terms_created: usize,
}

impl ImportSummary {
    fn record(&mut self, outcome: ItemOutcome) {
        if let ItemOutcome::SkuCreated { prices, terms } = outcome {
            self.skus_created += 1;
            self.prices_created += prices;
            self.terms_created += terms;
        }
    }
}

/// Walks the price pages and feeds every item through resolution, matching
/// and persistence.
///
/// A failed page fetch ends the run with that error; rows written for earlier
/// pages stay. A failed item is logged and skipped.
pub struct ImportOrchestrator<'a> {
    client: &'a AzureClient,
    store: &'a dyn CatalogStore,
    settings: &'a ImportSettings,
}

impl<'a> ImportOrchestrator<'a> {
    pub fn new(
        client: &'a AzureClient,
        store: &'a dyn CatalogStore,
        settings: &'a ImportSettings,
    ) -> Self {
        Self {
            client,
            store,
            settings,
        }
    }

    pub async fn run(&self, base_url: &str, mode: ImportMode<'_>) -> Result<ImportSummary> {
        let resolver = EntityResolver::new(self.store);
        let mut throttler = self.settings.throttler();
        let mut summary = ImportSummary::default();
        let mut next_url = Some(base_url.to_string());

        while let Some(url) = next_url.take() {
            let page = self.client.fetch_price_page(&url).await?;
            summary.pages += 1;
            info!(
                "Processing price page {} ({} items)",
                summary.pages,
                page.items.len()
            );

            for raw_item in page.items {
                summary.items += 1;
                match self.process_item(&resolver, raw_item, mode).await {
                    Ok(outcome) => summary.record(outcome),
                    Err(err) => {
                        summary.skipped += 1;
                        warn!("Skipping price item: {}", err);
                    }
                }
            }

            next_url = page.next_page_link;
            if let Some(next) = &next_url {
                debug!("Next page URL: {}", next);
            }
            throttler.page_completed(next_url.is_some()).await;
        }

        info!(
            "Import completed: {} pages, {} items, {} skipped, {} SKUs, {} prices, {} terms",
            summary.pages,
            summary.items,
            summary.skipped,
            summary.skus_created,
            summary.prices_created,
            summary.terms_created
        );

        Ok(summary)
    }

    async fn process_item(
        &self,
        resolver: &EntityResolver<'_>,
        raw_item: Value,
        mode: ImportMode<'_>,
    ) -> std::result::Result<ItemOutcome, ItemError> {
        let item = PriceItem::from_json(raw_item).map_err(ItemError::Malformed)?;
        let sku_keys = match mode {
            ImportMode::WithSkus(_) => Some(item.sku_keys()?),
            ImportMode::EntitiesOnly => None,
        };

        let entities = resolver
            .resolve(EntityKeys {
                provider_name: &self.settings.provider_name,
                region_code: &item.arm_region_name,
                region_name: &item.location,
                service_name: &self.settings.service_name,
            })
            .await?;

        let (ImportMode::WithSkus(catalog), Some(keys)) = (mode, sku_keys) else {
            return Ok(ItemOutcome::EntitiesResolved);
        };

        let record = catalog
            .find(keys.arm_sku_name)
            .ok_or_else(|| ItemError::NoMatchingSku(keys.arm_sku_name.to_string()))?;

        let new_sku = build_sku(&item, keys, record, &entities);
        let sku = self
            .store
            .create_sku(&new_sku)
            .await
            .map_err(|source| ItemError::SkuInsert {
                arm_sku_name: keys.arm_sku_name.to_string(),
                source,
            })?;
        debug!("SKU inserted successfully: {} (id {})", sku.name, sku.id);

        let (prices, terms) = self.persist_pricing(&item, keys, &sku).await;
        Ok(ItemOutcome::SkuCreated { prices, terms })
    }

    /// Price and term rows are best effort: the SKU stays if they fail.
    async fn persist_pricing(
        &self,
        item: &PriceItem,
        keys: SkuKeys<'_>,
        sku: &Sku,
    ) -> (usize, usize) {
        let Some(new_price) = build_price(item, sku.id) else {
            return (0, 0);
        };

        let price = match self.store.create_price(&new_price).await {
            Ok(price) => price,
            Err(e) => {
                warn!("Failed to insert price for SKU {}: {}", sku.id, e);
                return (0, 0);
            }
        };

        let Some(new_term) = build_term(item, keys, &price) else {
            return (1, 0);
        };

        match self.store.create_term(&new_term).await {
            Ok(_) => (1, 1),
            Err(e) => {
                warn!("Failed to insert term for price {}: {}", price.price_id, e);
                (1, 0)
            }
        }
    }
}

fn build_sku(
    item: &PriceItem,
    keys: SkuKeys<'_>,
    record: &SkuRecord,
    entities: &ResolvedEntities,
) -> NewSku {
    let capabilities = SkuCapabilities::extract(&record.capabilities);

    NewSku {
        service_id: entities.service.service_id,
        region_id: entities.region.region_id,
        arm_sku_name: keys.arm_sku_name.to_string(),
        name: record.name.clone(),
        sku_type: keys.price_type.to_string(),
        sku_id_api: item.sku_id.clone(),
        sku_name: item.sku_name.clone(),
        product_name: item.product_name.clone(),
        service_family: item.service_family.clone(),
        instance_sku: None,
        size: record.size.clone(),
        v_cpus: capabilities.v_cpus,
        memory_gb: capabilities.memory_gb,
        cpu_architecture_type: capabilities.cpu_architecture_type,
        operating_system: None,
        max_network_interfaces: capabilities.max_network_interfaces,
        storage: None,
    }
}

fn build_price(item: &PriceItem, sku_id: i32) -> Option<NewPrice> {
    let retail_price = item.retail_price.and_then(Decimal::from_f64)?.round_dp(6);
    let unit = item.unit_of_measure.as_deref().filter(|u| !u.is_empty())?;
    let effective_date = item
        .effective_start_date
        .as_deref()
        .and_then(|date| DateTime::parse_from_rfc3339(date).ok())?
        .with_timezone(&Utc);

    Some(NewPrice {
        sku_id,
        retail_price,
        unit: unit.to_string(),
        effective_date,
    })
}

fn build_term(item: &PriceItem, keys: SkuKeys<'_>, price: &Price) -> Option<NewTerm> {
    let lease = item.reservation_term.as_deref().filter(|t| !t.is_empty())?;

    Some(NewTerm {
        price_id: price.price_id,
        sku_id: price.sku_id,
        purchase_option: Some(keys.price_type.to_string()),
        lease_contract_length: Some(lease.to_string()),
        ..Default::default()
    })
}
