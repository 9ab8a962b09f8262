use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Values for a new `sku` row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewSku {
    pub service_id: i32,
    pub region_id: i32,
    pub arm_sku_name: String,
    pub name: String,
    pub sku_type: String,
    pub sku_id_api: Option<String>,
    pub sku_name: Option<String>,
    pub product_name: Option<String>,
    pub service_family: Option<String>,
    pub instance_sku: Option<String>,
    pub size: String,
    pub v_cpus: i32,
    pub memory_gb: String,
    pub cpu_architecture_type: String,
    pub operating_system: Option<String>,
    pub max_network_interfaces: String,
    pub storage: Option<String>,
}

/// Values for a new `price` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPrice {
    pub sku_id: i32,
    pub retail_price: Decimal,
    pub unit: String,
    pub effective_date: DateTime<Utc>,
}

/// Values for a new `terms` row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTerm {
    pub offer_term_code: Option<String>,
    pub price_id: i32,
    pub sku_id: i32,
    pub purchase_option: Option<String>,
    pub lease_contract_length: Option<String>,
    pub discounted_sku: Option<String>,
    pub discounted_rate: Option<Decimal>,
    pub offering_class: Option<String>,
}
