pub mod config;
pub mod error;
pub mod resolver;
pub mod sources;
pub mod throttle;
pub mod traits;

pub use config::ImportSettings;
pub use error::{ImporterError, ItemError, Result};
pub use resolver::{EntityKeys, EntityResolver, ResolvedEntities};
pub use throttle::BatchThrottler;
pub use traits::{CatalogImporter, ImportContext};

pub use sources::azure::{
    AzureClient, ClientCredentials, ImportSummary, PriceImporter, SkuImporter, TokenProvider,
};
