//! # Cart Store
//!
//! Persists the [`Cart`] aggregate under `cartItems`. Every rule lives in
//! `stepstyle-core`; this type only loads, applies, saves and notifies.

use std::sync::Arc;

use stepstyle_core::{Cart, CartLine, Money, Product};
use tracing::{debug, info};

use super::{load_json, save_json};
use crate::error::StoreResult;
use crate::events::{EventBus, StoreEvent};
use crate::kv::{keys, KvStore};

/// Cart persistence handle. Clones share the backend and the bus.
#[derive(Debug, Clone)]
pub struct CartStore {
    kv: Arc<dyn KvStore>,
    bus: EventBus,
}

impl CartStore {
    pub fn new(kv: Arc<dyn KvStore>, bus: EventBus) -> Self {
        CartStore { kv, bus }
    }

    /// Loads the current cart.
    pub async fn load(&self) -> StoreResult<Cart> {
        let lines: Vec<CartLine> = load_json(self.kv.as_ref(), keys::CART_ITEMS).await?;
        Ok(Cart::from_lines(lines))
    }

    pub async fn lines(&self) -> StoreResult<Vec<CartLine>> {
        Ok(self.load().await?.into_lines())
    }

    /// Adds one unit of `product` and returns the resulting line.
    pub async fn add(
        &self,
        product: &Product,
        size: Option<u32>,
        color: Option<String>,
    ) -> StoreResult<CartLine> {
        let mut cart = self.load().await?;
        let line = cart.add(product, size, color)?.clone();
        self.commit(&cart).await?;

        info!(
            product_id = line.product_id,
            size = line.selected_size,
            quantity = line.quantity,
            "Added to cart"
        );
        Ok(line)
    }

    /// Adds one unit with the product's default size and color.
    pub async fn add_default(&self, product: &Product) -> StoreResult<CartLine> {
        let mut cart = self.load().await?;
        let line = cart.add_default(product)?.clone();
        self.commit(&cart).await?;

        info!(product_id = line.product_id, quantity = line.quantity, "Added to cart");
        Ok(line)
    }

    /// Sets a line's quantity. Zero removes the line.
    pub async fn set_quantity(&self, product_id: u32, size: u32, quantity: u32) -> StoreResult<()> {
        let mut cart = self.load().await?;
        cart.set_quantity(product_id, size, quantity)?;
        self.commit(&cart).await?;

        debug!(product_id, size, quantity, "Cart quantity updated");
        Ok(())
    }

    /// Removes a line. Returns whether it was present.
    pub async fn remove(&self, product_id: u32, size: u32) -> StoreResult<bool> {
        let mut cart = self.load().await?;
        if !cart.remove(product_id, size) {
            return Ok(false);
        }
        self.commit(&cart).await?;

        debug!(product_id, size, "Removed from cart");
        Ok(true)
    }

    pub async fn clear(&self) -> StoreResult<()> {
        self.commit(&Cart::new()).await?;
        info!("Cart cleared");
        Ok(())
    }

    pub async fn subtotal(&self) -> StoreResult<Money> {
        Ok(self.load().await?.subtotal())
    }

    /// Badge count: number of distinct lines.
    pub async fn line_count(&self) -> StoreResult<usize> {
        Ok(self.load().await?.line_count())
    }

    pub async fn total_quantity(&self) -> StoreResult<u32> {
        Ok(self.load().await?.total_quantity())
    }

    async fn commit(&self, cart: &Cart) -> StoreResult<()> {
        save_json(self.kv.as_ref(), keys::CART_ITEMS, cart).await?;
        self.bus.publish(StoreEvent::CartChanged);
        Ok(())
    }
}
