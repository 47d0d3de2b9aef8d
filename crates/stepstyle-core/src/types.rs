//! # Domain Types
//!
//! Core domain types used throughout StepStyle.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    CartLine     │   │  Transaction    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (u32)       │──►│  product_id     │   │  id (CRD...)    │       │
//! │  │  price (₹)      │   │  selected_size  │   │  amount         │       │
//! │  │  sizes, colors  │   │  quantity       │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ PaymentMethod   │   │  PaymentStatus  │   │    AuthUser     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Card           │   │  Idle           │   │  email          │       │
//! │  │  Wallet         │   │  Processing     │   │  login_method   │       │
//! │  │  CashOnDelivery │   │  Success/Failed │   │  login_time     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persisted Shape
//! Types that live in the key-value store serialize with camelCase field
//! names (`imagePath`, `selectedSize`, `loginTime`). A cart line is stored
//! the way the web storefront stores it: the product record with `price` in
//! whole rupees plus `quantity`, `selectedSize` and `selectedColor`. Extra
//! product fields in a storefront blob (`category`, `sizes`, ...) are
//! ignored on read.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: u32,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Price in whole rupees, as the catalog file stores it.
    pub price: u32,

    /// Base directory of the product's images, e.g. `/images/Product3`.
    pub image_path: String,

    pub category: String,

    #[serde(default = "default_in_stock")]
    pub in_stock: bool,

    #[serde(default)]
    pub colors: Vec<String>,

    #[serde(default)]
    pub sizes: Vec<u32>,
}

fn default_in_stock() -> bool {
    true
}

impl Product {
    /// Unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_rupees(self.price as i64)
    }

    /// Color used when the shopper did not pick one.
    pub fn default_color(&self) -> String {
        self.colors.first().cloned().unwrap_or_default()
    }

    /// Size used when the product has no size options (0 = one size).
    pub fn default_size(&self) -> u32 {
        self.sizes.first().copied().unwrap_or(0)
    }

    pub fn has_sizes(&self) -> bool {
        !self.sizes.is_empty()
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// One product+size+quantity entry in the cart.
///
/// Identity is `(product_id, selected_size)`: adding the same product in a
/// different color but the same size merges into the existing line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    #[serde(rename = "id")]
    pub product_id: u32,

    pub name: String,

    /// Persisted as `price` in rupees.
    #[serde(rename = "price", with = "crate::money::rupees")]
    #[ts(type = "number")]
    pub unit_price: Money,

    /// Always >= 1. A line at zero is removed instead.
    pub quantity: u32,

    /// 0 for products without size options.
    #[serde(default)]
    pub selected_size: u32,

    #[serde(default)]
    pub selected_color: String,

    #[serde(default)]
    pub image_path: String,
}

impl CartLine {
    /// Builds a quantity-1 line from a catalog record.
    pub fn from_product(product: &Product, size: u32, color: String) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.unit_price(),
            quantity: 1,
            selected_size: size,
            selected_color: color,
            image_path: product.image_path.clone(),
        }
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }

    #[inline]
    pub fn matches(&self, product_id: u32, size: u32) -> bool {
        self.product_id == product_id && self.selected_size == size
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// The three checkout options offered by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PaymentMethod {
    /// Credit or debit card.
    Card,
    /// UPI-style mobile wallet.
    Wallet,
    /// Pay the courier on delivery.
    CashOnDelivery,
}

impl PaymentMethod {
    /// Prefix of the transaction id for this method.
    pub const fn transaction_prefix(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "CRD",
            PaymentMethod::Wallet => "GPAY",
            PaymentMethod::CashOnDelivery => "COD",
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Card
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Wallet => write!(f, "wallet"),
            PaymentMethod::CashOnDelivery => write!(f, "cod"),
        }
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// Where the checkout state machine currently sits.
///
/// ```text
///   Idle ──checkout()──► Processing ──┬──► Success ──(1.5s)──► order complete
///    ▲                                │
///    └────────── retry() ─────────────┴──► Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PaymentStatus {
    Idle,
    Processing,
    Success,
    Failed,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Idle
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// Status recorded on a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TransactionStatus {
    Processing,
    Successful,
    Failed,
    /// Cash on delivery orders are confirmed, not paid.
    Confirmed,
}

/// Extra details attached to a confirmed cash-on-delivery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DeliveryInfo {
    pub pincode: String,

    #[ts(as = "String")]
    pub estimated_delivery: NaiveDate,
}

/// The record of one checkout attempt. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Transaction {
    /// `CRD123456789`, `GPAY123456789` or `COD123456789`.
    pub id: String,

    /// Subtotal plus shipping.
    pub amount: Money,

    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,

    /// Human label, e.g. `Visa Card (****1111)`.
    pub method: String,

    pub status: TransactionStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub extra: Option<DeliveryInfo>,
}

// =============================================================================
// Accounts
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum LoginMethod {
    Password,
    Otp,
}

impl std::fmt::Display for LoginMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoginMethod::Password => write!(f, "password"),
            LoginMethod::Otp => write!(f, "otp"),
        }
    }
}

/// The signed-in shopper, stored under `authUser`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AuthUser {
    /// Email or phone number used to sign in.
    pub email: String,

    pub login_method: LoginMethod,

    #[ts(as = "String")]
    pub login_time: DateTime<Utc>,
}

/// An entry of the `registeredUsers` list.
///
/// Exactly one of `email` and `phone` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RegisteredUser {
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub phone: String,

    #[ts(as = "String")]
    pub registration_date: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sneaker() -> Product {
        Product {
            id: 3,
            name: "Court Classic".to_string(),
            description: String::new(),
            price: 2999,
            image_path: "/images/Product3".to_string(),
            category: "Sneakers".to_string(),
            in_stock: true,
            colors: vec!["White".to_string(), "Black".to_string()],
            sizes: vec![7, 8, 9],
        }
    }

    #[test]
    fn test_product_parses_catalog_json() {
        let json = r#"{
            "id": 3,
            "name": "Court Classic",
            "description": "Low top",
            "price": 2999,
            "imagePath": "/images/Product3",
            "category": "Sneakers",
            "inStock": false,
            "colors": ["White"],
            "sizes": [7, 8]
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.image_path, "/images/Product3");
        assert!(!product.in_stock);
        assert_eq!(product.unit_price(), Money::from_rupees(2999));
    }

    #[test]
    fn test_product_defaults() {
        let mut product = sneaker();
        assert_eq!(product.default_color(), "White");
        assert_eq!(product.default_size(), 7);

        product.colors.clear();
        product.sizes.clear();
        assert_eq!(product.default_color(), "");
        assert_eq!(product.default_size(), 0);
        assert!(!product.has_sizes());
    }

    #[test]
    fn test_cart_line_from_product() {
        let line = CartLine::from_product(&sneaker(), 8, "Black".to_string());
        assert_eq!(line.quantity, 1);
        assert!(line.matches(3, 8));
        assert!(!line.matches(3, 9));
        assert_eq!(line.line_total(), Money::from_rupees(2999));
    }

    #[test]
    fn test_cart_line_json_uses_storefront_names() {
        let line = CartLine::from_product(&sneaker(), 8, "Black".to_string());
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["selectedSize"], 8);
        assert_eq!(value["selectedColor"], "Black");
        assert_eq!(value["price"], 2999);
    }

    #[test]
    fn test_cart_line_reads_storefront_blob() {
        let json = r#"{
            "id": 1, "name": "Air Runner", "description": "Road shoe",
            "price": 2999, "imagePath": "/images/Product1", "category": "Running",
            "inStock": true, "colors": ["Red"], "sizes": [7, 8],
            "quantity": 2, "selectedSize": 8, "selectedColor": "Red"
        }"#;
        let line: CartLine = serde_json::from_str(json).unwrap();

        assert_eq!(line.product_id, 1);
        assert_eq!(line.unit_price, Money::from_rupees(2999));
        assert_eq!(line.line_total(), Money::from_rupees(5998));
        assert!(line.matches(1, 8));
    }

    #[test]
    fn test_transaction_prefixes() {
        assert_eq!(PaymentMethod::Card.transaction_prefix(), "CRD");
        assert_eq!(PaymentMethod::Wallet.transaction_prefix(), "GPAY");
        assert_eq!(PaymentMethod::CashOnDelivery.transaction_prefix(), "COD");
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&TransactionStatus::Confirmed).unwrap();
        assert_eq!(json, "\"confirmed\"");
        assert_eq!(PaymentStatus::default(), PaymentStatus::Idle);
    }
}
