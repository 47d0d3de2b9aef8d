//! # Key-Value Store
//!
//! The persistence seam. Every stateful component reads and writes string
//! blobs under fixed keys through [`KvStore`]; which backend sits behind it
//! is decided once at startup.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   CartStore   WishlistStore   AuthStore                                 │
//! │       │             │             │                                     │
//! │       └─────────────┼─────────────┘                                     │
//! │                     ▼                                                   │
//! │             Arc<dyn KvStore>                                            │
//! │               │          │                                              │
//! │               ▼          ▼                                              │
//! │        MemoryStore   SqliteStore (pool.rs)                              │
//! │        (tests, ephemeral)  (kv_store table)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StoreResult;

// =============================================================================
// Persisted Keys
// =============================================================================

/// Key names shared with the web storefront's local storage.
pub mod keys {
    pub const CART_ITEMS: &str = "cartItems";
    pub const WISHLIST_ITEMS: &str = "wishlistItems";
    pub const IS_AUTHENTICATED: &str = "isAuthenticated";
    pub const AUTH_USER: &str = "authUser";
    pub const REGISTERED_USERS: &str = "registeredUsers";
}

// =============================================================================
// Trait
// =============================================================================

/// String-keyed blob storage.
///
/// Writes replace the whole value. There is no compare-and-swap: two
/// concurrent read-modify-write cycles on the same key resolve as last
/// write wins.
#[async_trait]
pub trait KvStore: Debug + Send + Sync {
    /// Returns the value under `key`, or `None` if never written.
    async fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn write(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Deletes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> StoreResult<()>;
}

// =============================================================================
// Memory Backend
// =============================================================================

/// A process-local map. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn read(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        debug!(key = %key, bytes = value.len(), "memory write");
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        debug!(key = %key, "memory remove");
        self.entries.write().await.remove(key);
        Ok(())
    }
}
