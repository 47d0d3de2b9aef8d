//! # Checkout Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Checkout Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Shopper input  │  │   Flow          │  │     Plumbing            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Validation     │  │  InvalidState   │  │  Store                  │ │
//! │  │                 │  │  EmptyCart      │  │  ConfigLoadFailed       │ │
//! │  │                 │  │                 │  │  ConfigSaveFailed       │ │
//! │  │                 │  │                 │  │  InvalidConfig          │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A simulated decline is not an error: it is a `Failed` snapshot.

use stepstyle_core::{PaymentStatus, ValidationError};
use stepstyle_store::StoreError;
use thiserror::Error;

pub type CheckoutResult<T> = Result<T, CheckoutError>;

#[derive(Debug, Error)]
pub enum CheckoutError {
    // =========================================================================
    // Shopper Input
    // =========================================================================
    /// Form input rejected; the message is also shown in the snapshot.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    // =========================================================================
    // Flow
    // =========================================================================
    #[error("Cannot {action} while checkout is {status:?}")]
    InvalidState {
        action: &'static str,
        status: PaymentStatus,
    },

    #[error("Your cart is empty")]
    EmptyCart,

    // =========================================================================
    // Plumbing
    // =========================================================================
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid checkout configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),
}

impl CheckoutError {
    pub(crate) fn invalid_state(action: &'static str, status: PaymentStatus) -> Self {
        CheckoutError::InvalidState { action, status }
    }

    /// True when the shopper can fix the problem by editing the form.
    pub fn is_validation(&self) -> bool {
        matches!(self, CheckoutError::Validation(_))
            || matches!(self, CheckoutError::Store(e) if e.validation().is_some())
    }
}

impl From<std::io::Error> for CheckoutError {
    fn from(err: std::io::Error) -> Self {
        CheckoutError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for CheckoutError {
    fn from(err: toml::de::Error) -> Self {
        CheckoutError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for CheckoutError {
    fn from(err: toml::ser::Error) -> Self {
        CheckoutError::ConfigSaveFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_verbatim() {
        let err: CheckoutError = ValidationError::CardNumber.into();
        assert_eq!(err.to_string(), "Please enter a valid card number");
        assert!(err.is_validation());
    }

    #[test]
    fn test_invalid_state_message() {
        let err = CheckoutError::invalid_state("check out", PaymentStatus::Processing);
        assert_eq!(err.to_string(), "Cannot check out while checkout is Processing");
        assert!(!err.is_validation());
    }
}
