//! # stepstyle-store: Persistence Layer for StepStyle
//!
//! Everything the storefront remembers between page loads lives here: the
//! cart, the wishlist and the mock sign-in state, each a JSON blob under a
//! fixed key.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       StepStyle Data Flow                               │
//! │                                                                         │
//! │  CLI command / checkout simulator                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  stepstyle-store (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐   ┌────────────────┐   ┌────────────────┐   │   │
//! │  │   │ Repositories │   │   EventBus     │   │ CatalogLoader  │   │   │
//! │  │   │ CartStore    │──►│ CartChanged    │   │ products.json  │   │   │
//! │  │   │ WishlistStore│   │ WishlistChanged│   │ (read once)    │   │   │
//! │  │   │ AuthStore    │   │ AuthChanged    │   └────────────────┘   │   │
//! │  │   └──────┬───────┘   └────────────────┘                        │   │
//! │  │          ▼                                                      │   │
//! │  │   Arc<dyn KvStore>  ── MemoryStore | SqliteStore               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stepstyle_store::{Store, StoreConfig};
//!
//! let store = Store::sqlite(StoreConfig::from_env()?).await?;
//! let mut events = store.bus().subscribe();
//!
//! store.carts().add(&product, Some(9), None).await?;
//! assert_eq!(events.recv().await?, StoreEvent::CartChanged);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod events;
pub mod kv;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use catalog::CatalogLoader;
pub use error::{StoreError, StoreResult};
pub use events::{EventBus, StoreEvent};
pub use kv::{KvStore, MemoryStore};
pub use pool::{SqliteStore, StoreConfig};
pub use repository::{AuthStore, CartStore, WishlistStore};

use std::sync::Arc;

// =============================================================================
// Store Handle
// =============================================================================

/// One backend plus one bus, handed out as typed repositories.
///
/// Cheap to clone; clones share everything.
#[derive(Debug, Clone)]
pub struct Store {
    kv: Arc<dyn KvStore>,
    bus: EventBus,
}

impl Store {
    pub fn new(kv: Arc<dyn KvStore>, bus: EventBus) -> Self {
        Store { kv, bus }
    }

    /// An ephemeral store. Nothing is written to disk.
    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), EventBus::new())
    }

    /// Opens the SQLite database described by `config`.
    pub async fn sqlite(config: StoreConfig) -> StoreResult<Self> {
        let backend = SqliteStore::connect(config).await?;
        Ok(Self::new(Arc::new(backend), EventBus::new()))
    }

    pub fn carts(&self) -> CartStore {
        CartStore::new(self.kv.clone(), self.bus.clone())
    }

    pub fn wishlist(&self) -> WishlistStore {
        WishlistStore::new(self.kv.clone(), self.bus.clone())
    }

    pub fn auth(&self) -> AuthStore {
        AuthStore::new(self.kv.clone(), self.bus.clone())
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn kv(&self) -> &Arc<dyn KvStore> {
        &self.kv
    }
}
