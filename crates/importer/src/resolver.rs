use storage::CatalogStore;
use storage::models::{Provider, Region, Service};
use tracing::debug;

use crate::error::ItemError;

/// Natural keys of the entities a price item refers to
#[derive(Debug, Clone, Copy)]
pub struct EntityKeys<'a> {
    pub provider_name: &'a str,
    pub region_code: &'a str,
    pub region_name: &'a str,
    pub service_name: &'a str,
}

#[derive(Debug, Clone)]
pub struct ResolvedEntities {
    pub provider: Provider,
    pub region: Region,
    pub service: Service,
}

/// Find-or-create for provider, region and service rows.
///
/// Existing rows are returned untouched, so a changed upstream display name
/// never rewrites a stored region.
pub struct EntityResolver<'a> {
    store: &'a dyn CatalogStore,
}

impl<'a> EntityResolver<'a> {
    pub fn new(store: &'a dyn CatalogStore) -> Self {
        Self { store }
    }

    pub async fn resolve_provider(&self, name: &str) -> Result<Provider, ItemError> {
        let provider = self
            .store
            .find_or_create_provider(name)
            .await
            .map_err(|source| ItemError::ProviderResolution {
                name: name.to_string(),
                source,
            })?;

        debug!("Provider inserted or already exists: {}", provider.provider_name);
        Ok(provider)
    }

    pub async fn resolve_region(
        &self,
        provider_id: i32,
        code: &str,
        name: &str,
    ) -> Result<Region, ItemError> {
        let region = self
            .store
            .find_or_create_region(provider_id, code, name)
            .await
            .map_err(|source| ItemError::RegionResolution {
                code: code.to_string(),
                source,
            })?;

        debug!("Region inserted or already exists: {}", region.region_code);
        Ok(region)
    }

    pub async fn resolve_service(&self, provider_id: i32, name: &str) -> Result<Service, ItemError> {
        let service = self
            .store
            .find_or_create_service(provider_id, name)
            .await
            .map_err(|source| ItemError::ServiceResolution {
                name: name.to_string(),
                source,
            })?;

        debug!("Service inserted or already exists: {}", service.service_name);
        Ok(service)
    }

    /// Resolves all three entities; a provider failure skips region and service.
    pub async fn resolve(&self, keys: EntityKeys<'_>) -> Result<ResolvedEntities, ItemError> {
        let provider = self.resolve_provider(keys.provider_name).await?;
        let region = self
            .resolve_region(provider.provider_id, keys.region_code, keys.region_name)
            .await?;
        let service = self
            .resolve_service(provider.provider_id, keys.service_name)
            .await?;

        Ok(ResolvedEntities {
            provider,
            region,
            service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::InMemoryCatalogStore;

    fn keys<'a>(region_code: &'a str) -> EntityKeys<'a> {
        EntityKeys {
            provider_name: "Azure",
            region_code,
            region_name: "US East",
            service_name: "Virtual Machines",
        }
    }

    #[tokio::test]
    async fn test_resolving_twice_yields_same_rows() {
        let store = InMemoryCatalogStore::new();
        let resolver = EntityResolver::new(&store);

        let first = resolver.resolve(keys("eastus")).await.unwrap();
        let second = resolver.resolve(keys("eastus")).await.unwrap();

        assert_eq!(first.provider.provider_id, second.provider.provider_id);
        assert_eq!(first.region.region_id, second.region.region_id);
        assert_eq!(first.service.service_id, second.service.service_id);
        assert_eq!(store.providers().len(), 1);
        assert_eq!(store.regions().len(), 1);
        assert_eq!(store.services().len(), 1);
    }

    #[tokio::test]
    async fn test_new_region_reuses_provider_and_service() {
        let store = InMemoryCatalogStore::new();
        let resolver = EntityResolver::new(&store);

        let east = resolver.resolve(keys("eastus")).await.unwrap();
        let west = resolver.resolve(keys("westus")).await.unwrap();

        assert_ne!(east.region.region_id, west.region.region_id);
        assert_eq!(east.service.service_id, west.service.service_id);
        assert_eq!(west.region.provider_id, east.provider.provider_id);
        assert_eq!(store.regions().len(), 2);
    }

    #[tokio::test]
    async fn test_region_failure_is_item_error() {
        let store = InMemoryCatalogStore::new();
        let resolver = EntityResolver::new(&store);

        let err = resolver.resolve_region(7, "eastus", "US East").await.unwrap_err();
        assert!(matches!(err, ItemError::RegionResolution { ref code, .. } if code == "eastus"));
    }
}
