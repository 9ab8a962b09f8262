use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Provider {
    pub provider_id: i32,
    pub provider_name: String,
    pub created_date: chrono::NaiveDateTime,
    pub modified_date: chrono::NaiveDateTime,
    pub disable_flag: bool,
}
