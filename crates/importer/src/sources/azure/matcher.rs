use super::models::SkuRecord;

/// SKU catalog fetched once per run, in the order the API returned it.
#[derive(Debug, Clone, Default)]
pub struct SkuCatalog {
    records: Vec<SkuRecord>,
}

impl SkuCatalog {
    pub fn new(records: Vec<SkuRecord>) -> Self {
        Self { records }
    }

    /// First record whose name equals `arm_sku_name` exactly (case-sensitive).
    pub fn find(&self, arm_sku_name: &str) -> Option<&SkuRecord> {
        self.records.iter().find(|record| record.name == arm_sku_name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, size: &str) -> SkuRecord {
        SkuRecord {
            name: name.to_string(),
            size: size.to_string(),
            capabilities: Vec::new(),
        }
    }

    #[test]
    fn test_finds_exact_name() {
        let catalog = SkuCatalog::new(vec![
            record("Standard_B1s", "B1s"),
            record("Standard_D2s_v3", "D2s_v3"),
        ]);

        let found = catalog.find("Standard_D2s_v3").unwrap();
        assert_eq!(found.size, "D2s_v3");
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let catalog = SkuCatalog::new(vec![record("Standard_D2s_v3", "D2s_v3")]);
        assert!(catalog.find("standard_d2s_v3").is_none());
        assert!(catalog.find("Standard_D2s_v3 ").is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let catalog = SkuCatalog::new(vec![
            record("Standard_D2s_v3", "first"),
            record("Standard_D2s_v3", "second"),
        ]);
        assert_eq!(catalog.find("Standard_D2s_v3").unwrap().size, "first");
    }

    #[test]
    fn test_no_match_in_empty_catalog() {
        let catalog = SkuCatalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.find("Standard_D2s_v3").is_none());
    }
}
