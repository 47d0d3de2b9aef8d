//! # Checkout Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STEPSTYLE_SHIPPING_PAISE=0                                         │
//! │     STEPSTYLE_FAST_CHECKOUT=true                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/checkout.toml (Linux)                         │
//! │     ~/Library/Application Support/com.stepstyle.storefront/... (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     ₹499 shipping, 95% / 97% / 99% success                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # checkout.toml
//! [order]
//! shipping_paise = 49900
//!
//! [payments]
//! merchant_id = "soyxbshxikh@okhdfcbank"
//! card_success_rate = 0.95
//! wallet_success_rate = 0.97
//! cod_success_rate = 0.99
//!
//! [timing]
//! fast_checkout = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use stepstyle_core::{Money, PaymentMethod, DEFAULT_SHIPPING_PAISE};
use tracing::{debug, info, warn};

use crate::error::{CheckoutError, CheckoutResult};

pub const SHIPPING_ENV: &str = "STEPSTYLE_SHIPPING_PAISE";
pub const MERCHANT_ENV: &str = "STEPSTYLE_MERCHANT_ID";
pub const CARD_RATE_ENV: &str = "STEPSTYLE_CARD_SUCCESS_RATE";
pub const WALLET_RATE_ENV: &str = "STEPSTYLE_WALLET_SUCCESS_RATE";
pub const COD_RATE_ENV: &str = "STEPSTYLE_COD_SUCCESS_RATE";
pub const FAST_CHECKOUT_ENV: &str = "STEPSTYLE_FAST_CHECKOUT";

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSettings {
    /// Flat shipping charge added to every order.
    #[serde(default = "default_shipping")]
    pub shipping_paise: i64,
}

fn default_shipping() -> i64 {
    DEFAULT_SHIPPING_PAISE
}

impl Default for OrderSettings {
    fn default() -> Self {
        OrderSettings {
            shipping_paise: default_shipping(),
        }
    }
}

/// Simulated gateway behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSettings {
    /// Payee shown while a wallet transfer is authorized.
    #[serde(default = "default_merchant_id")]
    pub merchant_id: String,

    #[serde(default = "default_card_rate")]
    pub card_success_rate: f64,

    #[serde(default = "default_wallet_rate")]
    pub wallet_success_rate: f64,

    #[serde(default = "default_cod_rate")]
    pub cod_success_rate: f64,
}

fn default_merchant_id() -> String {
    "soyxbshxikh@okhdfcbank".to_string()
}

fn default_card_rate() -> f64 {
    0.95
}

fn default_wallet_rate() -> f64 {
    0.97
}

fn default_cod_rate() -> f64 {
    0.99
}

impl Default for PaymentSettings {
    fn default() -> Self {
        PaymentSettings {
            merchant_id: default_merchant_id(),
            card_success_rate: default_card_rate(),
            wallet_success_rate: default_wallet_rate(),
            cod_success_rate: default_cod_rate(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingSettings {
    /// Skip the stage pauses entirely.
    #[serde(default)]
    pub fast_checkout: bool,
}

// =============================================================================
// Main Checkout Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    #[serde(default)]
    pub order: OrderSettings,

    #[serde(default)]
    pub payments: PaymentSettings,

    #[serde(default)]
    pub timing: TimingSettings,
}

impl CheckoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (checkout.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CheckoutResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading checkout config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load checkout config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> CheckoutResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| CheckoutError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CheckoutError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| CheckoutError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Checkout config saved");
        Ok(())
    }

    pub fn validate(&self) -> CheckoutResult<()> {
        if self.order.shipping_paise < 0 {
            return Err(CheckoutError::InvalidConfig(
                "shipping_paise must not be negative".into(),
            ));
        }

        if self.payments.merchant_id.trim().is_empty() {
            return Err(CheckoutError::InvalidConfig("merchant_id must not be empty".into()));
        }

        let rates = [
            ("card_success_rate", self.payments.card_success_rate),
            ("wallet_success_rate", self.payments.wallet_success_rate),
            ("cod_success_rate", self.payments.cod_success_rate),
        ];
        for (name, rate) in rates {
            if !(0.0..=1.0).contains(&rate) {
                return Err(CheckoutError::InvalidConfig(format!(
                    "{name} must be between 0 and 1, got {rate}"
                )));
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`. Unparseable values are logged and
    /// ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup(SHIPPING_ENV) {
            match raw.parse::<i64>() {
                Ok(paise) => {
                    debug!(paise, "Overriding shipping from environment");
                    self.order.shipping_paise = paise;
                }
                Err(_) => warn!(value = %raw, "Ignoring invalid {}", SHIPPING_ENV),
            }
        }

        if let Some(id) = lookup(MERCHANT_ENV) {
            self.payments.merchant_id = id;
        }

        let rates = [
            (CARD_RATE_ENV, &mut self.payments.card_success_rate),
            (WALLET_RATE_ENV, &mut self.payments.wallet_success_rate),
            (COD_RATE_ENV, &mut self.payments.cod_success_rate),
        ];
        for (key, slot) in rates {
            if let Some(raw) = lookup(key) {
                match raw.parse::<f64>() {
                    Ok(rate) => *slot = rate,
                    Err(_) => warn!(value = %raw, "Ignoring invalid {}", key),
                }
            }
        }

        if let Some(raw) = lookup(FAST_CHECKOUT_ENV) {
            match raw.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.timing.fast_checkout = true,
                "0" | "false" | "no" => self.timing.fast_checkout = false,
                _ => warn!(value = %raw, "Ignoring invalid {}", FAST_CHECKOUT_ENV),
            }
        }
    }

    /// `checkout.toml` in the platform config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "stepstyle", "storefront")
            .map(|dirs| dirs.config_dir().join("checkout.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn shipping(&self) -> Money {
        Money::from_paise(self.order.shipping_paise)
    }

    pub fn success_rate(&self, method: PaymentMethod) -> f64 {
        match method {
            PaymentMethod::Card => self.payments.card_success_rate,
            PaymentMethod::Wallet => self.payments.wallet_success_rate,
            PaymentMethod::CashOnDelivery => self.payments.cod_success_rate,
        }
    }

    pub fn merchant_id(&self) -> &str {
        &self.payments.merchant_id
    }
}
