use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImporterError>;

/// Errors that end an import run.
#[derive(Error, Debug)]
pub enum ImporterError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}: {body}")]
    UnexpectedStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Unexpected response shape: {0}")]
    SchemaError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<validator::ValidationErrors> for ImporterError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::ValidationError(errors.to_string())
    }
}

/// Reasons a single price item is skipped. These never end a run.
#[derive(Error, Debug)]
pub enum ItemError {
    #[error("malformed price item: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("price item has no string '{0}'")]
    MissingField(&'static str),

    #[error("failed to resolve provider '{name}': {source}")]
    ProviderResolution {
        name: String,
        #[source]
        source: storage::error::StorageError,
    },

    #[error("failed to resolve region '{code}': {source}")]
    RegionResolution {
        code: String,
        #[source]
        source: storage::error::StorageError,
    },

    #[error("failed to resolve service '{name}': {source}")]
    ServiceResolution {
        name: String,
        #[source]
        source: storage::error::StorageError,
    },

    #[error("no matching SKU found for armSkuName '{0}'")]
    NoMatchingSku(String),

    #[error("failed to insert SKU '{arm_sku_name}': {source}")]
    SkuInsert {
        arm_sku_name: String,
        #[source]
        source: storage::error::StorageError,
    },
}
