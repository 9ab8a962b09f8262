use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Price {
    pub price_id: i32,
    pub sku_id: i32,
    pub retail_price: Decimal,
    pub unit: String,
    pub effective_date: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::NaiveDateTime,
    pub modified_at: chrono::NaiveDateTime,
    pub disable_flag: bool,
}
