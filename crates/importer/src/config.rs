use std::time::Duration;

use validator::Validate;

use crate::throttle::BatchThrottler;

pub const DEFAULT_PRICE_API_URL: &str = "https://prices.azure.com/api/retail/prices?api-version=2023-01-01-preview&$filter=serviceName%20eq%20%27Virtual%20Machines%27";
pub const DEFAULT_MANAGEMENT_API_URL: &str = "https://management.azure.com";
pub const DEFAULT_LOGIN_URL: &str = "https://login.microsoftonline.com";
pub const DEFAULT_PROVIDER_NAME: &str = "Azure";
pub const DEFAULT_SERVICE_NAME: &str = "Virtual Machines";

/// Settings shared by every import run.
#[derive(Debug, Clone, Validate)]
pub struct ImportSettings {
    /// First page of the retail prices query
    #[validate(url)]
    pub price_api_url: String,

    /// Resource Manager base URL; the SKU catalog path is appended
    #[validate(url)]
    pub management_api_url: String,

    /// Identity platform base URL; `/{tenant}/oauth2/v2.0/token` is appended
    #[validate(url)]
    pub login_url: String,

    #[validate(length(min = 1, max = 50))]
    pub provider_name: String,

    #[validate(length(min = 1, max = 50))]
    pub service_name: String,

    #[validate(range(min = 1))]
    pub pages_per_batch: u32,

    pub batch_pause: Duration,
}

impl ImportSettings {
    pub fn throttler(&self) -> BatchThrottler {
        BatchThrottler::new(self.pages_per_batch, self.batch_pause)
    }
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            price_api_url: DEFAULT_PRICE_API_URL.to_string(),
            management_api_url: DEFAULT_MANAGEMENT_API_URL.to_string(),
            login_url: DEFAULT_LOGIN_URL.to_string(),
            provider_name: DEFAULT_PROVIDER_NAME.to_string(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            pages_per_batch: BatchThrottler::DEFAULT_PAGES_PER_BATCH,
            batch_pause: BatchThrottler::DEFAULT_PAUSE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = ImportSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.pages_per_batch, 10);
        assert_eq!(settings.batch_pause, Duration::from_secs(2));
        assert_eq!(settings.provider_name, "Azure");
        assert_eq!(settings.service_name, "Virtual Machines");
    }

    #[test]
    fn test_zero_pages_per_batch_is_rejected() {
        let settings = ImportSettings {
            pages_per_batch: 0,
            ..Default::default()
        };
        let errors = settings.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("pages_per_batch"));
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let settings = ImportSettings {
            price_api_url: "not a url".to_string(),
            ..Default::default()
        };
        let errors = settings.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price_api_url"));
    }

    #[test]
    fn test_empty_service_name_is_rejected() {
        let settings = ImportSettings {
            service_name: String::new(),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
