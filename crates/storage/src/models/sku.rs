use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sku {
    pub id: i32,
    pub service_id: i32,
    pub region_id: i32,
    #[sqlx(rename = "armskuname")]
    pub arm_sku_name: String,
    pub name: String,
    #[sqlx(rename = "type")]
    pub sku_type: String,
    pub sku_id_api: Option<String>,
    pub sku_name: Option<String>,
    pub product_name: Option<String>,
    pub service_family: Option<String>,
    pub instance_sku: Option<String>,
    pub size: String,
    pub v_cpus: i32,
    /// Memory as reported by the catalog, in GB. Kept as text because the
    /// vendor mixes integers and decimals ("0.75", "8").
    pub memory_gb: String,
    pub cpu_architecture_type: String,
    pub operating_system: Option<String>,
    pub max_network_interfaces: String,
    pub storage: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub modified_at: chrono::NaiveDateTime,
    pub disable_flag: bool,
}
