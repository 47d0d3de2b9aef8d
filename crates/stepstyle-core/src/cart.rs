//! # Cart Aggregate
//!
//! The shopper's cart as a plain value. Persistence lives in stepstyle-store;
//! this type only enforces the cart rules.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Shopper Action            Method                 Cart Change           │
//! │  ──────────────            ──────                 ───────────           │
//! │                                                                         │
//! │  Add to Cart ────────────► add() ──────────────► push or qty += 1      │
//! │                                                                         │
//! │  Change Quantity ────────► set_quantity() ─────► qty = n (0 removes)   │
//! │                                                                         │
//! │  Remove ─────────────────► remove() ───────────► retain(!matches)      │
//! │                                                                         │
//! │  Order placed ───────────► clear() ────────────► lines.clear()         │
//! │                                                                         │
//! │  Totals are never stored: subtotal() walks the lines on every call.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{CartLine, Product};

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `(product_id, selected_size)`
/// - Every line has `quantity >= 1`
/// - No cap on lines or quantity: adding an existing line always increments
///
/// Serializes as a bare JSON array of lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a cart from stored lines, dropping any with zero quantity.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Cart {
            lines: lines.into_iter().filter(|l| l.quantity > 0).collect(),
        }
    }

    /// Adds one unit of `product`.
    ///
    /// ## Rules
    /// - Out-of-stock products are rejected
    /// - A size must be chosen when the product offers sizes
    /// - The color defaults to the product's first color
    /// - Same product and size already in the cart: quantity goes up by one
    pub fn add(
        &mut self,
        product: &Product,
        size: Option<u32>,
        color: Option<String>,
    ) -> CoreResult<&CartLine> {
        let size = match size {
            Some(size) if product.has_sizes() && !product.sizes.contains(&size) => {
                return Err(ValidationError::SizeUnavailable { size }.into());
            }
            Some(size) => size,
            None if product.has_sizes() => return Err(ValidationError::SizeRequired.into()),
            None => product.default_size(),
        };
        let color = color
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| product.default_color());

        self.add_line(product, size, color)
    }

    /// Adds one unit with the product's default size and color.
    ///
    /// Used when moving an item over from the wishlist, where no size was
    /// ever chosen.
    pub fn add_default(&mut self, product: &Product) -> CoreResult<&CartLine> {
        self.add_line(product, product.default_size(), product.default_color())
    }

    fn add_line(&mut self, product: &Product, size: u32, color: String) -> CoreResult<&CartLine> {
        if !product.in_stock {
            return Err(CoreError::OutOfStock {
                name: product.name.clone(),
            });
        }

        if let Some(idx) = self.position(product.id, size) {
            let line = &mut self.lines[idx];
            line.quantity = line.quantity.saturating_add(1);
            return Ok(&self.lines[idx]);
        }

        self.lines.push(CartLine::from_product(product, size, color));
        let last = self.lines.len() - 1;
        Ok(&self.lines[last])
    }

    /// Sets a line's quantity. Zero removes the line.
    pub fn set_quantity(&mut self, product_id: u32, size: u32, quantity: u32) -> CoreResult<()> {
        let idx = self
            .position(product_id, size)
            .ok_or(CoreError::LineNotFound { product_id, size })?;

        if quantity == 0 {
            self.lines.remove(idx);
        } else {
            self.lines[idx].quantity = quantity;
        }
        Ok(())
    }

    /// Removes a line. Returns whether anything was removed.
    pub fn remove(&mut self, product_id: u32, size: u32) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| !l.matches(product_id, size));
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    /// Number of distinct lines (the navbar badge count).
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Σ(unit_price × quantity).
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Subtotal plus a flat shipping charge.
    pub fn total_with_shipping(&self, shipping: Money) -> Money {
        self.subtotal() + shipping
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn position(&self, product_id: u32, size: u32) -> Option<usize> {
        self.lines.iter().position(|l| l.matches(product_id, size))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u32, price: u32) -> Product {
        Product {
            id,
            name: format!("Product {id}"),
            description: String::new(),
            price,
            image_path: format!("/images/Product{id}"),
            category: "Sneakers".to_string(),
            in_stock: true,
            colors: vec!["Black".to_string(), "White".to_string()],
            sizes: vec![7, 8, 9],
        }
    }

    fn assert_subtotal_invariant(cart: &Cart) {
        let expected: i64 = cart
            .lines()
            .iter()
            .map(|l| l.unit_price.paise() * l.quantity as i64)
            .sum();
        assert_eq!(cart.subtotal().paise(), expected);
    }

    #[test]
    fn test_add_requires_size() {
        let mut cart = Cart::new();
        let err = cart.add(&product(1, 2999), None, None).unwrap_err();
        assert_eq!(err.to_string(), "Please select a size");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_rejects_unknown_size() {
        let mut cart = Cart::new();
        let err = cart.add(&product(1, 2999), Some(12), None).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::SizeUnavailable { size: 12 })
        ));
    }

    #[test]
    fn test_add_sizeless_product_uses_defaults() {
        let mut cart = Cart::new();
        let mut socks = product(4, 299);
        socks.sizes.clear();

        let line = cart.add(&socks, None, None).unwrap();
        assert_eq!(line.selected_size, 0);
        assert_eq!(line.selected_color, "Black");
    }

    #[test]
    fn test_add_same_product_and_size_increments() {
        let mut cart = Cart::new();
        let p = product(1, 2999);

        cart.add(&p, Some(8), None).unwrap();
        cart.add(&p, Some(8), Some("White".to_string())).unwrap();
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        // Merge keeps the color chosen first
        assert_eq!(cart.lines()[0].selected_color, "Black");

        cart.add(&p, Some(9), None).unwrap();
        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.total_quantity(), 3);
        assert_subtotal_invariant(&cart);
    }

    #[test]
    fn test_out_of_stock_rejected() {
        let mut cart = Cart::new();
        let mut p = product(2, 1999);
        p.in_stock = false;
        assert!(matches!(
            cart.add(&p, Some(8), None),
            Err(CoreError::OutOfStock { .. })
        ));
        assert!(matches!(
            cart.add_default(&p),
            Err(CoreError::OutOfStock { .. })
        ));
    }

    #[test]
    fn test_set_quantity_and_remove() {
        let mut cart = Cart::new();
        cart.add(&product(1, 2999), Some(8), None).unwrap();
        cart.add(&product(2, 1500), Some(7), None).unwrap();

        cart.set_quantity(1, 8, 4).unwrap();
        assert_eq!(cart.subtotal(), Money::from_rupees(2999 * 4 + 1500));
        assert_subtotal_invariant(&cart);

        cart.set_quantity(1, 8, 0).unwrap();
        assert_eq!(cart.line_count(), 1);
        assert_subtotal_invariant(&cart);

        assert!(matches!(
            cart.set_quantity(1, 8, 2),
            Err(CoreError::LineNotFound { product_id: 1, size: 8 })
        ));

        assert!(cart.remove(2, 7));
        assert!(!cart.remove(2, 7));
        assert!(cart.is_empty());
        assert!(cart.subtotal().is_zero());
    }

    #[test]
    fn test_repeated_adds_always_increment() {
        let mut cart = Cart::new();
        let p = product(1, 100);
        for _ in 0..150 {
            cart.add_default(&p).unwrap();
        }
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 150);
        assert_subtotal_invariant(&cart);

        cart.set_quantity(1, p.default_size(), 500).unwrap();
        assert_eq!(cart.total_quantity(), 500);
    }

    #[test]
    fn test_total_with_shipping() {
        let mut cart = Cart::new();
        cart.add(&product(1, 2999), Some(8), None).unwrap();
        let total = cart.total_with_shipping(Money::from_paise(crate::DEFAULT_SHIPPING_PAISE));
        assert_eq!(total, Money::from_rupees(3498));
    }

    #[test]
    fn test_serializes_as_array() {
        let mut cart = Cart::new();
        cart.add(&product(1, 2999), Some(8), None).unwrap();
        let json = serde_json::to_value(&cart).unwrap();
        assert!(json.is_array());

        let back: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart);
    }

    #[test]
    fn test_from_lines_drops_empty_lines() {
        let mut line = CartLine::from_product(&product(1, 10), 8, "Black".to_string());
        line.quantity = 0;
        assert!(Cart::from_lines(vec![line]).is_empty());
    }
}
