//! # Application State
//!
//! Everything a command needs, opened once per invocation.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppState                                                               │
//! │  ├── store: Store            (SQLite file or in-memory, plus the bus)   │
//! │  ├── catalog: CatalogLoader  (products.json, read on first use)         │
//! │  └── checkout: CheckoutConfig                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use stepstyle_checkout::{CheckoutConfig, CheckoutSimulator};
use stepstyle_core::{Catalog, Product};
use stepstyle_store::{CatalogLoader, Store, StoreConfig};
use tracing::info;

use crate::error::{CliError, CliResult, ErrorCode};

/// Where state lives, as chosen on the command line.
#[derive(Debug, Clone, Default)]
pub struct StateOptions {
    pub database: Option<PathBuf>,
    pub in_memory: bool,
    pub catalog: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub fast_checkout: bool,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Store,
    pub catalog: CatalogLoader,
    pub checkout: CheckoutConfig,
}

impl AppState {
    pub async fn open(options: &StateOptions) -> CliResult<Self> {
        let store = if options.in_memory {
            info!("Using in-memory store");
            Store::memory()
        } else {
            let config = match &options.database {
                Some(path) => StoreConfig::new(path),
                None => StoreConfig::from_env()?,
            };
            Store::sqlite(config).await?
        };

        let catalog = match &options.catalog {
            Some(path) => CatalogLoader::new(path),
            None => CatalogLoader::from_env(),
        };

        let mut checkout = CheckoutConfig::load(options.config.clone())
            .map_err(|e| CliError::new(ErrorCode::Config, e.to_string()))?;
        if options.fast_checkout {
            checkout.timing.fast_checkout = true;
        }

        Ok(AppState {
            store,
            catalog,
            checkout,
        })
    }

    /// In-memory state over an already parsed catalog.
    pub fn ephemeral(catalog: Catalog, checkout: CheckoutConfig) -> Self {
        AppState {
            store: Store::memory(),
            catalog: CatalogLoader::preloaded(catalog),
            checkout,
        }
    }

    pub async fn catalog(&self) -> Arc<Catalog> {
        self.catalog.catalog().await
    }

    /// Catalog lookup that fails with a not-found error.
    pub async fn product(&self, id: u32) -> CliResult<Product> {
        self.catalog()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| CliError::not_found("Product", id))
    }

    pub fn simulator(&self) -> CheckoutSimulator {
        CheckoutSimulator::new(self.store.carts(), self.checkout.clone())
    }
}
