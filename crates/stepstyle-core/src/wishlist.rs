//! # Wishlist Aggregate
//!
//! A set of product snapshots keyed by product id. Membership is toggled,
//! never counted.

use serde::{Deserialize, Serialize};

use crate::types::Product;

/// A saved product. The full catalog record is kept so the wishlist page can
/// render without a catalog lookup.
pub type WishlistEntry = Product;

/// The shopper's wishlist.
///
/// ## Invariants
/// - At most one entry per product id
/// - Insertion order is preserved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist {
    entries: Vec<WishlistEntry>,
}

impl Wishlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a wishlist from stored entries, keeping the first copy of
    /// any duplicated id.
    pub fn from_entries(entries: Vec<WishlistEntry>) -> Self {
        let mut list = Wishlist::new();
        for entry in entries {
            if !list.contains(entry.id) {
                list.entries.push(entry);
            }
        }
        list
    }

    pub fn contains(&self, product_id: u32) -> bool {
        self.entries.iter().any(|e| e.id == product_id)
    }

    /// Adds the product if absent, removes it if present.
    ///
    /// Returns the new membership: `true` means the product is now saved.
    pub fn toggle(&mut self, product: &Product) -> bool {
        if self.remove(product.id) {
            false
        } else {
            self.entries.push(product.clone());
            true
        }
    }

    /// Removes an entry. Returns whether anything was removed.
    pub fn remove(&mut self, product_id: u32) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != product_id);
        self.entries.len() != before
    }

    pub fn get(&self, product_id: u32) -> Option<&WishlistEntry> {
        self.entries.iter().find(|e| e.id == product_id)
    }

    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u32) -> Product {
        Product {
            id,
            name: format!("Product {id}"),
            description: String::new(),
            price: 1999,
            image_path: format!("/images/Product{id}"),
            category: "Running".to_string(),
            in_stock: true,
            colors: vec![],
            sizes: vec![8],
        }
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let mut list = Wishlist::new();
        list.toggle(&product(2));
        let before = list.clone();

        assert!(list.toggle(&product(5)));
        assert!(list.contains(5));
        assert!(!list.toggle(&product(5)));
        assert_eq!(list, before);
    }

    #[test]
    fn test_remove_and_count() {
        let mut list = Wishlist::new();
        list.toggle(&product(1));
        list.toggle(&product(2));
        assert_eq!(list.count(), 2);
        assert!(list.remove(1));
        assert!(!list.remove(1));
        assert_eq!(list.entries()[0].id, 2);
        assert!(list.get(2).is_some());
    }

    #[test]
    fn test_from_entries_dedupes() {
        let list = Wishlist::from_entries(vec![product(1), product(1), product(3)]);
        assert_eq!(list.count(), 2);
    }
}
