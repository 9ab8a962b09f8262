use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ImporterError, ItemError, Result};

/// One page of the retail prices API.
///
/// Items stay as raw JSON so that a single malformed record can be skipped
/// without discarding the rest of the page.
#[derive(Debug, Clone)]
pub struct PricePage {
    pub items: Vec<Value>,
    pub next_page_link: Option<String>,
}

impl PricePage {
    pub fn from_json(mut document: Value) -> Result<Self> {
        let Some(items) =
            take_array(&mut document, "Items").or_else(|| take_array(&mut document, "value"))
        else {
            return Err(ImporterError::SchemaError(
                "price page has no 'Items' array".to_string(),
            ));
        };

        Ok(Self {
            items,
            next_page_link: non_empty_link(&document, "NextPageLink"),
        })
    }
}

/// One retail price record
///
/// Only the region fields are needed to resolve entities; the SKU fields are
/// checked by [`PriceItem::sku_keys`] when a SKU row is about to be built.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PriceItem {
    #[serde(rename = "armSkuName", default, deserialize_with = "string_or_none")]
    pub arm_sku_name: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "string_or_none")]
    pub price_type: Option<String>,
    #[serde(rename = "armRegionName", default, deserialize_with = "string_or_empty")]
    pub arm_region_name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub location: String,
    #[serde(rename = "skuId")]
    pub sku_id: Option<String>,
    #[serde(rename = "skuName")]
    pub sku_name: Option<String>,
    #[serde(rename = "productName")]
    pub product_name: Option<String>,
    #[serde(rename = "serviceFamily")]
    pub service_family: Option<String>,
    #[serde(rename = "retailPrice")]
    pub retail_price: Option<f64>,
    #[serde(rename = "unitOfMeasure")]
    pub unit_of_measure: Option<String>,
    #[serde(rename = "effectiveStartDate")]
    pub effective_start_date: Option<String>,
    #[serde(rename = "reservationTerm")]
    pub reservation_term: Option<String>,
}

/// SKU identity of a price item, present only when both fields are strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkuKeys<'a> {
    pub arm_sku_name: &'a str,
    pub price_type: &'a str,
}

impl PriceItem {
    pub fn from_json(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    pub fn sku_keys(&self) -> std::result::Result<SkuKeys<'_>, ItemError> {
        let arm_sku_name = self
            .arm_sku_name
            .as_deref()
            .ok_or(ItemError::MissingField("armSkuName"))?;
        let price_type = self
            .price_type
            .as_deref()
            .ok_or(ItemError::MissingField("type"))?;

        Ok(SkuKeys {
            arm_sku_name,
            price_type,
        })
    }
}

/// One page of the `Microsoft.Compute/skus` listing
#[derive(Debug, Clone)]
pub struct SkuCatalogPage {
    pub records: Vec<SkuRecord>,
    pub next_link: Option<String>,
}

impl SkuCatalogPage {
    pub fn from_json(mut document: Value) -> Result<Self> {
        let Some(values) = take_array(&mut document, "value") else {
            return Err(ImporterError::SchemaError(
                "SKU catalog response has no 'value' array".to_string(),
            ));
        };

        // Non-object entries cannot carry a name and are never matchable.
        let records = values
            .into_iter()
            .filter_map(|value| serde_json::from_value::<SkuRecord>(value).ok())
            .collect();

        Ok(Self {
            records,
            next_link: non_empty_link(&document, "nextLink"),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SkuRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: String,
    #[serde(default, deserialize_with = "lenient_capabilities")]
    pub capabilities: Vec<Capability>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Capability {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl Capability {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

fn take_array(document: &mut Value, key: &str) -> Option<Vec<Value>> {
    match document.get_mut(key).map(Value::take) {
        Some(Value::Array(items)) => Some(items),
        _ => None,
    }
}

fn non_empty_link(document: &Value, key: &str) -> Option<String> {
    document
        .get(key)
        .and_then(Value::as_str)
        .filter(|link| !link.is_empty())
        .map(str::to_string)
}

/// Missing, null and non-string values all read as absent.
fn string_or_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn string_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    string_or_none(deserializer).map(Option::unwrap_or_default)
}

/// Capabilities that are not `{name, value}` string pairs are dropped rather
/// than failing the whole SKU record.
fn lenient_capabilities<'de, D>(deserializer: D) -> std::result::Result<Vec<Capability>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|value| serde_json::from_value::<Capability>(value).ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_price_page_without_next_link_is_last() {
        let page = PricePage::from_json(json!({ "Items": [{}], "NextPageLink": null })).unwrap();
        assert_eq!(page.items.len(), 1);
        assert!(page.next_page_link.is_none());

        let page = PricePage::from_json(json!({ "Items": [], "NextPageLink": "" })).unwrap();
        assert!(page.next_page_link.is_none());

        let page = PricePage::from_json(json!({ "Items": [] })).unwrap();
        assert!(page.next_page_link.is_none());
    }

    #[test]
    fn test_price_page_keeps_next_link() {
        let page = PricePage::from_json(json!({
            "Items": [],
            "NextPageLink": "https://prices.azure.com/api/retail/prices?$skip=100"
        }))
        .unwrap();
        assert_eq!(
            page.next_page_link.as_deref(),
            Some("https://prices.azure.com/api/retail/prices?$skip=100")
        );
    }

    #[test]
    fn test_price_page_accepts_value_array() {
        let page = PricePage::from_json(json!({ "value": [{}, {}] })).unwrap();
        assert_eq!(page.items.len(), 2);
    }

    #[test]
    fn test_price_page_without_items_is_schema_error() {
        let err = PricePage::from_json(json!({ "NextPageLink": "x" })).unwrap_err();
        assert!(matches!(err, ImporterError::SchemaError(_)));

        let err = PricePage::from_json(json!({ "Items": "nope" })).unwrap_err();
        assert!(matches!(err, ImporterError::SchemaError(_)));
    }

    #[test]
    fn test_price_item_decodes_sku_keys() {
        let item = PriceItem::from_json(json!({
            "armRegionName": "eastus",
            "location": "US East",
            "armSkuName": "Standard_D2s_v3",
            "type": "Consumption",
            "retailPrice": 0.096,
            "unitOfMeasure": "1 Hour"
        }))
        .unwrap();
        let keys = item.sku_keys().unwrap();
        assert_eq!(keys.arm_sku_name, "Standard_D2s_v3");
        assert_eq!(keys.price_type, "Consumption");
        assert_eq!(item.retail_price, Some(0.096));
        assert!(item.sku_id.is_none());

        assert!(PriceItem::from_json(json!("not an object")).is_err());
    }

    #[test]
    fn test_price_item_without_sku_fields_still_decodes() {
        let item = PriceItem::from_json(json!({
            "armRegionName": "westus",
            "armSkuName": null,
            "type": 3
        }))
        .unwrap();
        assert_eq!(item.arm_region_name, "westus");
        assert_eq!(item.location, "");
        assert!(matches!(item.sku_keys(), Err(ItemError::MissingField("armSkuName"))));

        let item = PriceItem::from_json(json!({ "armSkuName": "Standard_B1s" })).unwrap();
        assert!(matches!(item.sku_keys(), Err(ItemError::MissingField("type"))));
    }

    #[test]
    fn test_null_region_fields_read_as_empty() {
        let item = PriceItem::from_json(json!({
            "armRegionName": null,
            "location": null,
            "armSkuName": "Standard_D2s_v3",
            "type": "Consumption"
        }))
        .unwrap();
        assert_eq!(item.arm_region_name, "");
        assert_eq!(item.location, "");
    }

    #[test]
    fn test_catalog_page_decodes_records() {
        let page = SkuCatalogPage::from_json(json!({
            "value": [
                {
                    "name": "Standard_D2s_v3",
                    "size": "D2s_v3",
                    "capabilities": [
                        { "name": "vCPUs", "value": "2" },
                        { "name": "Broken", "value": 7 },
                        "garbage"
                    ]
                },
                { "name": "Standard_B1s" },
                42
            ],
            "nextLink": "https://management.azure.com/next"
        }))
        .unwrap();

        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[0].capabilities, vec![Capability::new("vCPUs", "2")]);
        assert!(page.records[1].capabilities.is_empty());
        assert_eq!(page.next_link.as_deref(), Some("https://management.azure.com/next"));
    }

    #[test]
    fn test_catalog_page_without_value_is_schema_error() {
        let err = SkuCatalogPage::from_json(json!({ "items": [] })).unwrap_err();
        assert!(matches!(err, ImporterError::SchemaError(_)));
    }
}
