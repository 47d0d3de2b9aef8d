//! # Catalog
//!
//! In-memory product catalog built from the storefront's `products.json`.
//! Reading the file (and caching it) is the store crate's job.
//!
//! Walking shoes are sold under Running: records tagged `Walking` are
//! recategorized when the catalog is built, so `Walking` never shows up as
//! a category or filter.

use crate::types::Product;

const MERGED_CATEGORY: &str = "Walking";
const MERGED_INTO: &str = "Running";

/// An ordered list of catalog records with lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(mut products: Vec<Product>) -> Self {
        for product in &mut products {
            if product.category == MERGED_CATEGORY {
                product.category = MERGED_INTO.to_string();
            }
        }
        Catalog { products }
    }

    /// Parses a JSON array of products.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Vec<Product>>(json).map(Catalog::new)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: u32) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products in `category`, in catalog order. Match is exact.
    pub fn by_category(&self, category: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for product in &self.products {
            if !seen.contains(&product.category.as_str()) {
                seen.push(&product.category);
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"[
        {"id": 1, "name": "Air Glide", "description": "", "price": 4999,
         "imagePath": "/images/Product1", "category": "Running",
         "inStock": true, "colors": ["Blue"], "sizes": [7, 8]},
        {"id": 2, "name": "Court Classic", "description": "", "price": 2999,
         "imagePath": "/images/Product2", "category": "Sneakers",
         "inStock": true, "colors": [], "sizes": []},
        {"id": 3, "name": "Trail Pro", "description": "", "price": 5999,
         "imagePath": "/images/Product3", "category": "Running",
         "inStock": false, "colors": [], "sizes": [9]}
    ]"#;

    #[test]
    fn test_lookups() {
        let catalog = Catalog::from_json(JSON).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(2).map(|p| p.name.as_str()), Some("Court Classic"));
        assert!(catalog.get(42).is_none());

        let running: Vec<u32> = catalog.by_category("Running").iter().map(|p| p.id).collect();
        assert_eq!(running, vec![1, 3]);
        assert!(catalog.by_category("running").is_empty());
    }

    #[test]
    fn test_categories_first_seen_order() {
        let catalog = Catalog::from_json(JSON).unwrap();
        assert_eq!(catalog.categories(), vec!["Running", "Sneakers"]);
    }

    #[test]
    fn test_walking_sold_as_running() {
        let json = JSON.replace(r#""category": "Sneakers""#, r#""category": "Walking""#);
        let catalog = Catalog::from_json(&json).unwrap();
        assert_eq!(catalog.categories(), vec!["Running"]);
        assert_eq!(catalog.by_category("Running").len(), 3);
        assert!(catalog.by_category("Walking").is_empty());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(Catalog::from_json("{not json").is_err());
        assert!(Catalog::default().is_empty());
    }
}
