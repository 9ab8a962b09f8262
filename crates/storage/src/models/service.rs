use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Service {
    pub service_id: i32,
    pub provider_id: i32,
    pub service_name: String,
    pub created_date: chrono::NaiveDateTime,
    pub modified_date: chrono::NaiveDateTime,
    pub disable_flag: bool,
}
