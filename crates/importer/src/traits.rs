use storage::CatalogStore;

use crate::Result;
use crate::config::ImportSettings;
use crate::sources::azure::ImportSummary;

pub struct ImportContext<'a> {
    pub store: &'a dyn CatalogStore,
    pub settings: &'a ImportSettings,
}

#[async_trait::async_trait]
pub trait CatalogImporter: Send + Sync {
    async fn import(&self, context: &ImportContext<'_>) -> Result<ImportSummary>;

    fn name(&self) -> &'static str;
}
