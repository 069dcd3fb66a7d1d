//! Wishlist store.

use std::sync::Arc;

use alfath_core::{Product, ProductId};
use tokio::sync::watch;

use super::{CartStore, PersistedList};
use crate::storage::{KeyValueStore, RestoreState};

/// Storage key holding the wishlist snapshot.
pub const WISHLIST_STORAGE_KEY: &str = "wishlist";

/// Products saved for later, at most one entry per product id.
pub struct WishlistStore {
    items: PersistedList<Product>,
}

impl WishlistStore {
    /// Restore the wishlist from `storage`, starting empty if nothing usable is stored.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            items: PersistedList::restore(WISHLIST_STORAGE_KEY, storage, dedup_products),
        }
    }

    /// Save `product`. Does nothing (and emits nothing) if already saved.
    pub fn add_item(&self, product: Product) {
        self.items.update_if(|items| {
            if items.iter().any(|p| p.id == product.id) {
                return false;
            }
            items.push(product);
            true
        });
    }

    /// Remove `product_id` if saved.
    pub fn remove_item(&self, product_id: ProductId) {
        self.items.update(|items| items.retain(|p| p.id != product_id));
    }

    /// Remove `product` if saved, save it otherwise. Returns whether it is
    /// saved afterwards.
    pub fn toggle(&self, product: Product) -> bool {
        if self.contains(product.id) {
            self.remove_item(product.id);
            false
        } else {
            self.add_item(product);
            true
        }
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.read(|items| items.iter().any(|p| p.id == product_id))
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.items.update(Vec::clear);
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.items.read(<[Product]>::len)
    }

    /// A copy of the saved products, in the order they were added.
    #[must_use]
    pub fn items(&self) -> Vec<Product> {
        self.items.snapshot()
    }

    /// Subscribe to wishlist changes. Drop the receiver to unsubscribe.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Product>> {
        self.items.subscribe()
    }

    /// Add every in-stock saved product to `cart` with quantity 1.
    ///
    /// The wishlist itself is left unchanged. Returns how many products were
    /// added.
    pub fn add_all_to_cart(&self, cart: &CartStore) -> usize {
        let in_stock: Vec<Product> = self
            .items
            .read(|items| items.iter().filter(|p| p.in_stock).cloned().collect());
        let added = in_stock.len();
        for product in in_stock {
            cart.add_item(product, 1);
        }
        added
    }

    /// How the startup restore went.
    #[must_use]
    pub const fn restore_state(&self) -> &RestoreState {
        self.items.restore_state()
    }
}

fn dedup_products(restored: Vec<Product>) -> Vec<Product> {
    let mut items: Vec<Product> = Vec::with_capacity(restored.len());
    for product in restored {
        if !items.iter().any(|p| p.id == product.id) {
            items.push(product);
        }
    }
    items
}
