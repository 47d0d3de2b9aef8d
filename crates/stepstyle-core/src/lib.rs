//! # stepstyle-core: Pure Storefront Logic for StepStyle
//!
//! This crate holds every storefront rule that can be expressed without I/O:
//! money math, cart and wishlist aggregates, input validation, card network
//! detection, catalog lookups and image fallback decisions.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        StepStyle Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 stepstyle-cli (or any UI shell)                 │   │
//! │  │    catalog ──► cart ──► wishlist ──► checkout ──► auth          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          stepstyle-checkout (simulated payment flows)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │       stepstyle-store (KV persistence + notification bus)       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stepstyle-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌──────────┐ ┌────────┐ │   │
//! │  │   │  money  │ │  cart   │ │ wishlist │ │validation│ │ images │ │   │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └──────────┘ └────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO RNG • PURE FUNCTIONS                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, CartLine, Transaction, ...)
//! - [`money`] - Money type with integer arithmetic (paise, never floats)
//! - [`error`] - Domain error types
//! - [`validation`] - Checkout and account input rules
//! - [`card`] - Card network detection
//! - [`cart`] - The cart aggregate
//! - [`wishlist`] - The wishlist aggregate
//! - [`catalog`] - Product catalog model and lookups
//! - [`images`] - Image fallback resolution
//!
//! ## Example Usage
//!
//! ```rust
//! use stepstyle_core::money::Money;
//!
//! let price = Money::from_rupees(2999);
//! let shipping = Money::from_paise(49_900);
//! assert_eq!((price + shipping).to_string(), "₹3498.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod card;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod images;
pub mod money;
pub mod types;
pub mod validation;
pub mod wishlist;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use card::CardNetwork;
pub use cart::Cart;
pub use catalog::Catalog;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
pub use wishlist::Wishlist;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Flat shipping charge added to every order, in paise (₹499).
pub const DEFAULT_SHIPPING_PAISE: i64 = 49_900;
