use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A provider region. `region_code` is the ARM region name (`eastus`),
/// `region_name` the display location (`US East`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Region {
    pub region_id: i32,
    pub provider_id: i32,
    pub region_code: String,
    pub region_name: String,
    pub created_date: chrono::NaiveDateTime,
    pub modified_date: chrono::NaiveDateTime,
    pub disable_flag: bool,
}
