//! # Error Types
//!
//! Domain-specific error types for stepstyle-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stepstyle-core errors (this file)                                     │
//! │  ├── CoreError        - Cart/catalog rule violations                   │
//! │  └── ValidationError  - Form input failures (user-facing text)         │
//! │                                                                         │
//! │  stepstyle-store errors (separate crate)                               │
//! │  └── StoreError       - Backend and serialization failures             │
//! │                                                                         │
//! │  stepstyle-checkout errors (separate crate)                            │
//! │  └── CheckoutError    - Simulator state and config failures            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → CheckoutError → UI   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `ValidationError` renders as the exact sentence shown under a form field,
//! so its `Display` output is part of the contract with the UI.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Cart and catalog rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(u32),

    /// Product is flagged `inStock: false`.
    #[error("{name} is currently out of stock")]
    OutOfStock { name: String },

    /// No cart line matches the (product, size) key.
    #[error("No cart line for product {product_id} in size {size}")]
    LineNotFound { product_id: u32, size: u32 },

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation failures.
///
/// Each variant's message is the text the storefront shows next to the
/// offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    // -------------------------------------------------------------------------
    // Card form
    // -------------------------------------------------------------------------
    #[error("Please enter a valid card number")]
    CardNumber,

    #[error("Please enter a valid expiry date (MM/YY)")]
    ExpiryFormat,

    #[error("Your card has expired")]
    CardExpired,

    #[error("Invalid expiry month")]
    ExpiryMonth,

    #[error("American Express cards require a 4-digit CVV")]
    AmexCvv,

    #[error("Please enter a valid 3-digit CVV")]
    Cvv,

    #[error("Please enter the cardholder name")]
    CardholderName,

    // -------------------------------------------------------------------------
    // Cash on delivery form
    // -------------------------------------------------------------------------
    #[error("Please enter your delivery address")]
    AddressMissing,

    #[error("Please enter a complete delivery address")]
    AddressIncomplete,

    #[error("Please include a valid 6-digit pincode in your address")]
    PincodeMissing,

    // -------------------------------------------------------------------------
    // Product options
    // -------------------------------------------------------------------------
    #[error("Please select a size")]
    SizeRequired,

    #[error("Size {size} is not offered for this product")]
    SizeUnavailable { size: u32 },

    // -------------------------------------------------------------------------
    // Account forms
    // -------------------------------------------------------------------------
    /// Login form wording.
    #[error("Please enter a valid email or phone number")]
    Identifier,

    /// Signup form wording.
    #[error("Please enter a valid email or 10-digit phone number")]
    SignupIdentifier,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Please enter a valid 6-digit OTP")]
    Otp,

    #[error("Name must be at least 3 characters")]
    NameTooShort,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
