//! In-process [`CatalogStore`] used for dry runs and pipeline tests.
//!
//! Keys and identities behave like the PostgreSQL tables: ids start at 1 and
//! increase per table, natural keys are unique per provider, and nothing is
//! ever updated in place.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::dto::{NewPrice, NewSku, NewTerm};
use crate::error::{Result, StorageError};
use crate::models::{Price, Provider, Region, Service, Sku, Term};
use crate::repository::CatalogStore;

#[derive(Debug, Default)]
struct Tables {
    providers: Vec<Provider>,
    regions: Vec<Region>,
    services: Vec<Service>,
    skus: Vec<Sku>,
    prices: Vec<Price>,
    terms: Vec<Term>,
}

#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    tables: Mutex<Tables>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // Rows are append-only, so a poisoned lock still holds consistent tables.
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn providers(&self) -> Vec<Provider> {
        self.lock().providers.clone()
    }

    pub fn regions(&self) -> Vec<Region> {
        self.lock().regions.clone()
    }

    pub fn services(&self) -> Vec<Service> {
        self.lock().services.clone()
    }

    pub fn skus(&self) -> Vec<Sku> {
        self.lock().skus.clone()
    }

    pub fn prices(&self) -> Vec<Price> {
        self.lock().prices.clone()
    }

    pub fn terms(&self) -> Vec<Term> {
        self.lock().terms.clone()
    }
}

fn next_id(len: usize) -> i32 {
    i32::try_from(len).map_or(i32::MAX, |n| n.saturating_add(1))
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn find_or_create_provider(&self, provider_name: &str) -> Result<Provider> {
        let mut tables = self.lock();
        if let Some(existing) = tables
            .providers
            .iter()
            .find(|p| p.provider_name == provider_name)
        {
            return Ok(existing.clone());
        }

        let now = Utc::now().naive_utc();
        let provider = Provider {
            provider_id: next_id(tables.providers.len()),
            provider_name: provider_name.to_string(),
            created_date: now,
            modified_date: now,
            disable_flag: false,
        };
        tables.providers.push(provider.clone());
        Ok(provider)
    }

    async fn find_or_create_region(
        &self,
        provider_id: i32,
        region_code: &str,
        region_name: &str,
    ) -> Result<Region> {
        let mut tables = self.lock();
        if !tables.providers.iter().any(|p| p.provider_id == provider_id) {
            return Err(StorageError::ConstraintViolation(
                "region.provider_id references a missing row".to_string(),
            ));
        }
        if let Some(existing) = tables
            .regions
            .iter()
            .find(|r| r.provider_id == provider_id && r.region_code == region_code)
        {
            return Ok(existing.clone());
        }

        let now = Utc::now().naive_utc();
        let region = Region {
            region_id: next_id(tables.regions.len()),
            provider_id,
            region_code: region_code.to_string(),
            region_name: region_name.to_string(),
            created_date: now,
            modified_date: now,
            disable_flag: false,
        };
        tables.regions.push(region.clone());
        Ok(region)
    }

    async fn find_or_create_service(
        &self,
        provider_id: i32,
        service_name: &str,
    ) -> Result<Service> {
        let mut tables = self.lock();
        if !tables.providers.iter().any(|p| p.provider_id == provider_id) {
            return Err(StorageError::ConstraintViolation(
                "service.provider_id references a missing row".to_string(),
            ));
        }
        if let Some(existing) = tables
            .services
            .iter()
            .find(|s| s.provider_id == provider_id && s.service_name == service_name)
        {
            return Ok(existing.clone());
        }

        let now = Utc::now().naive_utc();
        let service = Service {
            service_id: next_id(tables.services.len()),
            provider_id,
            service_name: service_name.to_string(),
            created_date: now,
            modified_date: now,
            disable_flag: false,
        };
        tables.services.push(service.clone());
        Ok(service)
    }

    async fn create_sku(&self, sku: &NewSku) -> Result<Sku> {
        let mut tables = self.lock();
        let service_exists = tables.services.iter().any(|s| s.service_id == sku.service_id);
        let region_exists = tables.regions.iter().any(|r| r.region_id == sku.region_id);
        if !service_exists || !region_exists {
            return Err(StorageError::ConstraintViolation(
                "sku.service_id/region_id references a missing row".to_string(),
            ));
        }

        let now = Utc::now().naive_utc();
        let row = Sku {
            id: next_id(tables.skus.len()),
            service_id: sku.service_id,
            region_id: sku.region_id,
            arm_sku_name: sku.arm_sku_name.clone(),
            name: sku.name.clone(),
            sku_type: sku.sku_type.clone(),
            sku_id_api: sku.sku_id_api.clone(),
            sku_name: sku.sku_name.clone(),
            product_name: sku.product_name.clone(),
            service_family: sku.service_family.clone(),
            instance_sku: sku.instance_sku.clone(),
            size: sku.size.clone(),
            v_cpus: sku.v_cpus,
            memory_gb: sku.memory_gb.clone(),
            cpu_architecture_type: sku.cpu_architecture_type.clone(),
            operating_system: sku.operating_system.clone(),
            max_network_interfaces: sku.max_network_interfaces.clone(),
            storage: sku.storage.clone(),
            created_at: now,
            modified_at: now,
            disable_flag: false,
        };
        tables.skus.push(row.clone());
        Ok(row)
    }

    async fn create_price(&self, price: &NewPrice) -> Result<Price> {
        let mut tables = self.lock();
        if !tables.skus.iter().any(|s| s.id == price.sku_id) {
            return Err(StorageError::ConstraintViolation(
                "price.sku_id references a missing row".to_string(),
            ));
        }

        let now = Utc::now().naive_utc();
        let row = Price {
            price_id: next_id(tables.prices.len()),
            sku_id: price.sku_id,
            retail_price: price.retail_price,
            unit: price.unit.clone(),
            effective_date: price.effective_date,
            created_at: now,
            modified_at: now,
            disable_flag: false,
        };
        tables.prices.push(row.clone());
        Ok(row)
    }

    async fn create_term(&self, term: &NewTerm) -> Result<Term> {
        let mut tables = self.lock();
        let price_exists = tables.prices.iter().any(|p| p.price_id == term.price_id);
        let sku_exists = tables.skus.iter().any(|s| s.id == term.sku_id);
        if !price_exists || !sku_exists {
            return Err(StorageError::ConstraintViolation(
                "terms.price_id/sku_id references a missing row".to_string(),
            ));
        }

        let now = Utc::now().naive_utc();
        let row = Term {
            offer_term_id: next_id(tables.terms.len()),
            offer_term_code: term.offer_term_code.clone(),
            price_id: term.price_id,
            sku_id: term.sku_id,
            purchase_option: term.purchase_option.clone(),
            lease_contract_length: term.lease_contract_length.clone(),
            discounted_sku: term.discounted_sku.clone(),
            discounted_rate: term.discounted_rate,
            offering_class: term.offering_class.clone(),
            created_date: now,
            modified_date: now,
            disable_flag: false,
        };
        tables.terms.push(row.clone());
        Ok(row)
    }
}
