//! # Catalog Loader
//!
//! Reads the product list from a JSON file once per loader and serves it
//! from memory afterwards.
//!
//! A missing or malformed file is logged and yields an empty catalog: the
//! storefront still renders, just with nothing in it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use stepstyle_core::Catalog;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::error::{StoreError, StoreResult};

/// Environment variable overriding the catalog file location.
pub const CATALOG_PATH_ENV: &str = "STEPSTYLE_CATALOG_PATH";

/// Catalog location when nothing else is configured.
pub const DEFAULT_CATALOG_PATH: &str = "data/products.json";

/// Lazily loaded, cached catalog.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    path: PathBuf,
    cache: Arc<OnceCell<Arc<Catalog>>>,
}

impl CatalogLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CatalogLoader {
            path: path.into(),
            cache: Arc::new(OnceCell::new()),
        }
    }

    /// Uses `STEPSTYLE_CATALOG_PATH` if set, otherwise [`DEFAULT_CATALOG_PATH`].
    pub fn from_env() -> Self {
        let path = std::env::var(CATALOG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CATALOG_PATH.to_string());
        Self::new(path)
    }

    /// A loader that never touches the file system.
    pub fn preloaded(catalog: Catalog) -> Self {
        CatalogLoader {
            path: PathBuf::new(),
            cache: Arc::new(OnceCell::new_with(Some(Arc::new(catalog)))),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The catalog, reading the file on first use.
    pub async fn catalog(&self) -> Arc<Catalog> {
        self.cache
            .get_or_init(|| async {
                match read_catalog(&self.path).await {
                    Ok(catalog) => {
                        info!(path = %self.path.display(), products = catalog.len(), "Catalog loaded");
                        Arc::new(catalog)
                    }
                    Err(e) => {
                        warn!(path = %self.path.display(), error = %e, "Catalog unavailable, serving empty list");
                        Arc::new(Catalog::default())
                    }
                }
            })
            .await
            .clone()
    }
}

/// Reads and parses a catalog file without caching.
pub async fn read_catalog(path: &Path) -> StoreResult<Catalog> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| StoreError::Catalog(format!("{}: {e}", path.display())))?;
    Catalog::from_json(&raw).map_err(|e| StoreError::Catalog(format!("{}: {e}", path.display())))
}
