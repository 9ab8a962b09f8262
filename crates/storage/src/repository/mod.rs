mod catalog;

pub use catalog::CatalogRepository;

use crate::dto::{NewPrice, NewSku, NewTerm};
use crate::error::Result;
use crate::models::{Price, Provider, Region, Service, Sku, Term};

/// Persistence operations the import pipeline relies on.
///
/// The `find_or_create_*` methods are keyed by natural identifiers and must
/// return the same row for the same key no matter how often they are called.
/// The `create_*` methods always insert.
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_or_create_provider(&self, provider_name: &str) -> Result<Provider>;

    async fn find_or_create_region(
        &self,
        provider_id: i32,
        region_code: &str,
        region_name: &str,
    ) -> Result<Region>;

    async fn find_or_create_service(&self, provider_id: i32, service_name: &str)
    -> Result<Service>;

    async fn create_sku(&self, sku: &NewSku) -> Result<Sku>;

    async fn create_price(&self, price: &NewPrice) -> Result<Price>;

    async fn create_term(&self, term: &NewTerm) -> Result<Term>;
}
