use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of the `terms` table: reservation terms attached to a price.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Term {
    pub offer_term_id: i32,
    pub offer_term_code: Option<String>,
    pub price_id: i32,
    pub sku_id: i32,
    pub purchase_option: Option<String>,
    pub lease_contract_length: Option<String>,
    pub discounted_sku: Option<String>,
    pub discounted_rate: Option<Decimal>,
    pub offering_class: Option<String>,
    pub created_date: chrono::NaiveDateTime,
    pub modified_date: chrono::NaiveDateTime,
    pub disable_flag: bool,
}
