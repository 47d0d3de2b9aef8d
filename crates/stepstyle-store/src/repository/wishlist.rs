//! # Wishlist Store
//!
//! Persists the [`Wishlist`] under `wishlistItems`.

use std::sync::Arc;

use stepstyle_core::wishlist::WishlistEntry;
use stepstyle_core::{CartLine, Product, Wishlist};
use tracing::{debug, info};

use super::cart::CartStore;
use super::{load_json, save_json};
use crate::error::{StoreError, StoreResult};
use crate::events::{EventBus, StoreEvent};
use crate::kv::{keys, KvStore};

#[derive(Debug, Clone)]
pub struct WishlistStore {
    kv: Arc<dyn KvStore>,
    bus: EventBus,
}

impl WishlistStore {
    pub fn new(kv: Arc<dyn KvStore>, bus: EventBus) -> Self {
        WishlistStore { kv, bus }
    }

    pub async fn load(&self) -> StoreResult<Wishlist> {
        let entries: Vec<WishlistEntry> =
            load_json(self.kv.as_ref(), keys::WISHLIST_ITEMS).await?;
        Ok(Wishlist::from_entries(entries))
    }

    pub async fn entries(&self) -> StoreResult<Vec<WishlistEntry>> {
        Ok(self.load().await?.entries().to_vec())
    }

    pub async fn contains(&self, product_id: u32) -> StoreResult<bool> {
        Ok(self.load().await?.contains(product_id))
    }

    /// Saves or unsaves `product`. Returns the new membership.
    pub async fn toggle(&self, product: &Product) -> StoreResult<bool> {
        let mut list = self.load().await?;
        let saved = list.toggle(product);
        self.commit(&list).await?;

        info!(product_id = product.id, saved, "Wishlist toggled");
        Ok(saved)
    }

    /// Removes an entry. Returns whether it was present.
    pub async fn remove(&self, product_id: u32) -> StoreResult<bool> {
        let mut list = self.load().await?;
        if !list.remove(product_id) {
            return Ok(false);
        }
        self.commit(&list).await?;

        debug!(product_id, "Removed from wishlist");
        Ok(true)
    }

    /// Moves a saved product into the cart with its default size and color.
    ///
    /// The entry only leaves the wishlist once the cart accepted it, so an
    /// out-of-stock product stays saved.
    pub async fn move_to_cart(&self, product_id: u32, cart: &CartStore) -> StoreResult<CartLine> {
        let mut list = self.load().await?;
        let product = list
            .get(product_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Wishlist entry", product_id))?;

        let line = cart.add_default(&product).await?;
        list.remove(product_id);
        self.commit(&list).await?;

        info!(product_id, quantity = line.quantity, "Moved wishlist entry to cart");
        Ok(line)
    }

    pub async fn count(&self) -> StoreResult<usize> {
        Ok(self.load().await?.count())
    }

    async fn commit(&self, list: &Wishlist) -> StoreResult<()> {
        save_json(self.kv.as_ref(), keys::WISHLIST_ITEMS, list).await?;
        self.bus.publish(StoreEvent::WishlistChanged);
        Ok(())
    }
}
