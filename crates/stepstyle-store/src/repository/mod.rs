//! # Repository Module
//!
//! Typed stores over the raw key-value backend.
//!
//! ## Read-Modify-Write
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  store.carts().add(&product, Some(9), None)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  read "cartItems" ──► JSON decode ──► Cart (stepstyle-core)            │
//! │                                          │                              │
//! │                                          ▼  cart.add(...)  (rules)      │
//! │  write "cartItems" ◄── JSON encode ◄─────┘                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  bus.publish(CartChanged)                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A blob that fails to decode is logged and treated as empty; the next
//! successful mutation overwrites it.
//!
//! ## Available Repositories
//!
//! - [`CartStore`] - Cart lines under `cartItems`
//! - [`WishlistStore`] - Saved products under `wishlistItems`
//! - [`AuthStore`] - Mock sign-in state and registered accounts

pub mod auth;
pub mod cart;
pub mod wishlist;

pub use auth::AuthStore;
pub use cart::CartStore;
pub use wishlist::WishlistStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::{StoreError, StoreResult};
use crate::kv::KvStore;

/// Decodes the blob under `key`, falling back to `T::default()` when it is
/// missing or unreadable.
pub(crate) async fn load_json<T>(kv: &dyn KvStore, key: &str) -> StoreResult<T>
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = kv.read(key).await? else {
        return Ok(T::default());
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!(key = %key, error = %e, "Discarding unreadable stored value");
            Ok(T::default())
        }
    }
}

/// Encodes `value` and replaces the blob under `key`.
pub(crate) async fn save_json<T>(kv: &dyn KvStore, key: &str, value: &T) -> StoreResult<()>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|e| StoreError::serialization(key, e))?;
    kv.write(key, &raw).await
}
