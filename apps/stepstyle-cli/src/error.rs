//! # CLI Errors
//!
//! Every layer's error collapses into one [`CliError`]: a code that picks the
//! process exit status and the message printed for the shopper.
//!
//! ```text
//!   ValidationError / CoreError::Validation  → Validation  (exit 2)
//!   CoreError::{ProductNotFound, LineNotFound},
//!   StoreError::NotFound                     → NotFound    (exit 3)
//!   CoreError (other rules)                  → Rejected    (exit 4)
//!   CheckoutError::{InvalidState, EmptyCart} → Checkout    (exit 5)
//!   StoreError (backend), config errors      → Storage / Config (exit 1)
//! ```

use std::fmt;

use stepstyle_checkout::CheckoutError;
use stepstyle_core::{CoreError, ValidationError};
use stepstyle_store::StoreError;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Form input rejected.
    Validation,
    NotFound,
    /// A storefront rule refused the action (out of stock, no size chosen).
    Rejected,
    /// The checkout flow is not in a state that allows the action.
    Checkout,
    Storage,
    Config,
}

impl ErrorCode {
    pub const fn exit_code(self) -> i32 {
        match self {
            ErrorCode::Validation => 2,
            ErrorCode::NotFound => 3,
            ErrorCode::Rejected => 4,
            ErrorCode::Checkout => 5,
            ErrorCode::Storage | ErrorCode::Config => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CliError {
    pub code: ErrorCode,
    pub message: String,
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        CliError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }
}

pub type CliResult<T> = Result<T, CliError>;

// =============================================================================
// Conversions
// =============================================================================

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::new(ErrorCode::Validation, err.to_string())
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::Validation(_) => ErrorCode::Validation,
            CoreError::ProductNotFound(_) | CoreError::LineNotFound { .. } => ErrorCode::NotFound,
            _ => ErrorCode::Rejected,
        };
        CliError::new(code, err.to_string())
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Core(core) => core.into(),
            StoreError::NotFound { .. } => CliError::new(ErrorCode::NotFound, err.to_string()),
            other => CliError::new(ErrorCode::Storage, other.to_string()),
        }
    }
}

impl From<CheckoutError> for CliError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Validation(v) => v.into(),
            CheckoutError::Store(store) => store.into(),
            CheckoutError::InvalidState { .. } | CheckoutError::EmptyCart => {
                CliError::new(ErrorCode::Checkout, err.to_string())
            }
            other => CliError::new(ErrorCode::Config, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_validation_keeps_message() {
        let err: CliError = StoreError::from(ValidationError::SizeRequired).into();
        assert_eq!(err.code, ErrorCode::Validation);
        assert_eq!(err.to_string(), "Please select a size");
        assert_eq!(err.code.exit_code(), 2);
    }

    #[test]
    fn test_store_mapping() {
        let err: CliError = StoreError::not_found("Wishlist entry", 7).into();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err: CliError = StoreError::PoolExhausted.into();
        assert_eq!(err.code, ErrorCode::Storage);

        let err: CliError = StoreError::Core(CoreError::OutOfStock {
            name: "Air Glide".to_string(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::Rejected);
        assert_eq!(err.message, "Air Glide is currently out of stock");
    }

    #[test]
    fn test_checkout_mapping() {
        let err: CliError = CheckoutError::EmptyCart.into();
        assert_eq!(err.code, ErrorCode::Checkout);
        assert_eq!(err.code.exit_code(), 5);

        let err: CliError = CheckoutError::InvalidConfig("bad".into()).into();
        assert_eq!(err.code, ErrorCode::Config);
    }
}
