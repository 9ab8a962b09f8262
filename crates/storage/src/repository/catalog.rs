use sqlx::PgPool;
use tracing::debug;

use super::CatalogStore;
use crate::dto::{NewPrice, NewSku, NewTerm};
use crate::error::{Result, StorageError};
use crate::models::{Price, Provider, Region, Service, Sku, Term};

const PROVIDER_COLUMNS: &str =
    "provider_id, provider_name, created_date, modified_date, disable_flag";
const REGION_COLUMNS: &str =
    "region_id, provider_id, region_code, region_name, created_date, modified_date, disable_flag";
const SERVICE_COLUMNS: &str =
    "service_id, provider_id, service_name, created_date, modified_date, disable_flag";
const SKU_COLUMNS: &str = "id, service_id, region_id, armskuname, name, type, sku_id_api, \
     sku_name, product_name, service_family, instance_sku, size, v_cpus, memory_gb, \
     cpu_architecture_type, operating_system, max_network_interfaces, storage, created_at, \
     modified_at, disable_flag";
const PRICE_COLUMNS: &str =
    "price_id, sku_id, retail_price, unit, effective_date, created_at, modified_at, disable_flag";
const TERM_COLUMNS: &str = "offer_term_id, offer_term_code, price_id, sku_id, purchase_option, \
     lease_contract_length, discounted_sku, discounted_rate, offering_class, created_date, \
     modified_date, disable_flag";

/// PostgreSQL implementation of [`CatalogStore`].
///
/// Find-or-create relies on the unique constraints from the initial migration:
/// a lookup is tried first, and an insert that loses a race against another
/// importer (SQLSTATE 23505) falls back to reading the winning row.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_provider(&self, provider_name: &str) -> Result<Option<Provider>> {
        let provider = sqlx::query_as::<_, Provider>(&format!(
            "SELECT {PROVIDER_COLUMNS} FROM provider WHERE provider_name = $1"
        ))
        .bind(provider_name)
        .fetch_optional(self.pool)
        .await?;

        Ok(provider)
    }

    pub async fn find_region(&self, provider_id: i32, region_code: &str) -> Result<Option<Region>> {
        let region = sqlx::query_as::<_, Region>(&format!(
            "SELECT {REGION_COLUMNS} FROM region WHERE provider_id = $1 AND region_code = $2"
        ))
        .bind(provider_id)
        .bind(region_code)
        .fetch_optional(self.pool)
        .await?;

        Ok(region)
    }

    pub async fn find_service(
        &self,
        provider_id: i32,
        service_name: &str,
    ) -> Result<Option<Service>> {
        let service = sqlx::query_as::<_, Service>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM service WHERE provider_id = $1 AND service_name = $2"
        ))
        .bind(provider_id)
        .bind(service_name)
        .fetch_optional(self.pool)
        .await?;

        Ok(service)
    }
}

/// Settles an insert that may have lost a race on a natural key: a unique
/// violation re-reads the row another writer committed.
async fn settle_insert<T, F, Fut>(inserted: Result<T>, key: String, reread: F) -> Result<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    match inserted {
        Err(e) if e.is_unique_violation() => {
            debug!("{} created concurrently, re-reading", key);
            reread().await?.ok_or(StorageError::NotFound(key))
        }
        other => other,
    }
}

#[async_trait::async_trait]
impl<'a> CatalogStore for CatalogRepository<'a> {
    async fn find_or_create_provider(&self, provider_name: &str) -> Result<Provider> {
        if let Some(provider) = self.find_provider(provider_name).await? {
            return Ok(provider);
        }

        let inserted = sqlx::query_as::<_, Provider>(&format!(
            "INSERT INTO provider (provider_name) VALUES ($1) RETURNING {PROVIDER_COLUMNS}"
        ))
        .bind(provider_name)
        .fetch_one(self.pool)
        .await
        .map_err(StorageError::from);

        settle_insert(inserted, format!("provider '{provider_name}'"), || {
            self.find_provider(provider_name)
        })
        .await
    }

    async fn find_or_create_region(
        &self,
        provider_id: i32,
        region_code: &str,
        region_name: &str,
    ) -> Result<Region> {
        if let Some(region) = self.find_region(provider_id, region_code).await? {
            return Ok(region);
        }

        let inserted = sqlx::query_as::<_, Region>(&format!(
            "INSERT INTO region (provider_id, region_code, region_name) VALUES ($1, $2, $3) \
             RETURNING {REGION_COLUMNS}"
        ))
        .bind(provider_id)
        .bind(region_code)
        .bind(region_name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from_insert(e, "region.provider_id"));

        settle_insert(inserted, format!("region '{region_code}'"), || {
            self.find_region(provider_id, region_code)
        })
        .await
    }

    async fn find_or_create_service(
        &self,
        provider_id: i32,
        service_name: &str,
    ) -> Result<Service> {
        if let Some(service) = self.find_service(provider_id, service_name).await? {
            return Ok(service);
        }

        let inserted = sqlx::query_as::<_, Service>(&format!(
            "INSERT INTO service (provider_id, service_name) VALUES ($1, $2) \
             RETURNING {SERVICE_COLUMNS}"
        ))
        .bind(provider_id)
        .bind(service_name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from_insert(e, "service.provider_id"));

        settle_insert(inserted, format!("service '{service_name}'"), || {
            self.find_service(provider_id, service_name)
        })
        .await
    }

    async fn create_sku(&self, sku: &NewSku) -> Result<Sku> {
        let sku = sqlx::query_as::<_, Sku>(&format!(
            r#"
            INSERT INTO sku (
                service_id, region_id, armskuname, name, type, sku_id_api, sku_name,
                product_name, service_family, instance_sku, size, v_cpus, memory_gb,
                cpu_architecture_type, operating_system, max_network_interfaces, storage
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING {SKU_COLUMNS}
            "#
        ))
        .bind(sku.service_id)
        .bind(sku.region_id)
        .bind(&sku.arm_sku_name)
        .bind(&sku.name)
        .bind(&sku.sku_type)
        .bind(&sku.sku_id_api)
        .bind(&sku.sku_name)
        .bind(&sku.product_name)
        .bind(&sku.service_family)
        .bind(&sku.instance_sku)
        .bind(&sku.size)
        .bind(sku.v_cpus)
        .bind(&sku.memory_gb)
        .bind(&sku.cpu_architecture_type)
        .bind(&sku.operating_system)
        .bind(&sku.max_network_interfaces)
        .bind(&sku.storage)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from_insert(e, "sku.service_id/region_id"))?;

        Ok(sku)
    }

    async fn create_price(&self, price: &NewPrice) -> Result<Price> {
        let price = sqlx::query_as::<_, Price>(&format!(
            "INSERT INTO price (sku_id, retail_price, unit, effective_date) \
             VALUES ($1, $2, $3, $4) RETURNING {PRICE_COLUMNS}"
        ))
        .bind(price.sku_id)
        .bind(price.retail_price)
        .bind(&price.unit)
        .bind(price.effective_date)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from_insert(e, "price.sku_id"))?;

        Ok(price)
    }

    async fn create_term(&self, term: &NewTerm) -> Result<Term> {
        let term = sqlx::query_as::<_, Term>(&format!(
            r#"
            INSERT INTO terms (
                offer_term_code, price_id, sku_id, purchase_option, lease_contract_length,
                discounted_sku, discounted_rate, offering_class
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {TERM_COLUMNS}
            "#
        ))
        .bind(&term.offer_term_code)
        .bind(term.price_id)
        .bind(term.sku_id)
        .bind(&term.purchase_option)
        .bind(&term.lease_contract_length)
        .bind(&term.discounted_sku)
        .bind(term.discounted_rate)
        .bind(&term.offering_class)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from_insert(e, "terms.price_id/sku_id"))?;

        Ok(term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::test_support::database_error;
    use chrono::Utc;

    fn provider(id: i32) -> Provider {
        let now = Utc::now().naive_utc();
        Provider {
            provider_id: id,
            provider_name: "Azure".to_string(),
            created_date: now,
            modified_date: now,
            disable_flag: false,
        }
    }

    #[tokio::test]
    async fn test_lost_race_returns_winning_row() {
        let inserted = Err(StorageError::from(database_error("23505")));

        let provider = settle_insert(inserted, "provider 'Azure'".to_string(), || async {
            Ok(Some(provider(7)))
        })
        .await
        .unwrap();

        assert_eq!(provider.provider_id, 7);
    }

    #[tokio::test]
    async fn test_lost_race_without_winner_is_not_found() {
        let inserted: Result<Provider> = Err(StorageError::from(database_error("23505")));

        let err = settle_insert(inserted, "provider 'Azure'".to_string(), || async { Ok(None) })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "provider 'Azure' not found");
    }

    #[tokio::test]
    async fn test_other_insert_outcomes_skip_reread() {
        let inserted = Ok(provider(1));
        let provider = settle_insert(inserted, "provider 'Azure'".to_string(), || async {
            Ok(Some(provider(99)))
        })
        .await
        .unwrap();
        assert_eq!(provider.provider_id, 1);

        let inserted: Result<Provider> =
            Err(StorageError::from_insert(database_error("23503"), "region.provider_id"));
        let err = settle_insert(inserted, "region 'eastus'".to_string(), || async { Ok(None) })
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation(_)));
    }
}
