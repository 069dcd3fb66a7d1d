//! Shopping cart store.

use std::sync::Arc;

use alfath_core::{CartLine, CartTotals, Product, ProductId};
use rust_decimal::Decimal;
use tokio::sync::watch;

use super::PersistedList;
use crate::storage::{KeyValueStore, RestoreState};

/// Storage key holding the cart snapshot.
pub const CART_STORAGE_KEY: &str = "cart";

/// The shopping cart.
///
/// Holds at most one line per product id, and every line has a quantity of at
/// least 1: setting a line's quantity to 0 removes it.
pub struct CartStore {
    lines: PersistedList<CartLine>,
}

impl CartStore {
    /// Restore the cart from `storage`, starting empty if nothing usable is stored.
    ///
    /// Restored lines are normalized: zero-quantity lines are dropped and
    /// repeated product ids are merged into the first line.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            lines: PersistedList::restore(CART_STORAGE_KEY, storage, normalize_lines),
        }
    }

    /// Add `quantity` units of `product`.
    ///
    /// Increments the existing line for the product, or appends a new one.
    /// Adding zero units does nothing.
    pub fn add_item(&self, product: Product, quantity: u32) {
        if quantity == 0 {
            return;
        }
        self.lines.update(|lines| {
            if let Some(line) = lines.iter_mut().find(|l| l.product.id == product.id) {
                line.quantity = line.quantity.saturating_add(quantity);
            } else {
                lines.push(CartLine::new(product, quantity));
            }
        });
    }

    /// Remove the line for `product_id`, if any.
    pub fn remove_item(&self, product_id: ProductId) {
        self.lines
            .update(|lines| lines.retain(|l| l.product.id != product_id));
    }

    /// Set the quantity of the line for `product_id`.
    ///
    /// Does nothing if the product is not in the cart. A quantity of 0 removes
    /// the line.
    pub fn update_quantity(&self, product_id: ProductId, quantity: u32) {
        self.lines.update(|lines| {
            if quantity == 0 {
                lines.retain(|l| l.product.id != product_id);
            } else if let Some(line) = lines.iter_mut().find(|l| l.product.id == product_id) {
                line.quantity = quantity;
            }
        });
    }

    /// Remove every line.
    pub fn clear(&self) {
        self.lines.update(Vec::clear);
    }

    /// A copy of the current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.lines.snapshot()
    }

    /// Subscribe to cart changes. Drop the receiver to unsubscribe.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<CartLine>> {
        self.lines.subscribe()
    }

    /// Whether the cart has a line for `product_id`.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.lines
            .read(|lines| lines.iter().any(|l| l.product.id == product_id))
    }

    /// Quantity in the cart for `product_id`, 0 when absent.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.lines.read(|lines| {
            lines
                .iter()
                .find(|l| l.product.id == product_id)
                .map_or(0, |l| l.quantity)
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.read(<[CartLine]>::is_empty)
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_item_count(&self) -> u32 {
        self.totals().item_count
    }

    /// Sum of discounted price times quantity across all lines.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.totals().total
    }

    /// All derived totals, recomputed from the current lines.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        self.lines.read(CartTotals::from_lines)
    }

    /// How the startup restore went.
    #[must_use]
    pub const fn restore_state(&self) -> &RestoreState {
        self.lines.restore_state()
    }
}

fn normalize_lines(restored: Vec<CartLine>) -> Vec<CartLine> {
    let mut lines: Vec<CartLine> = Vec::with_capacity(restored.len());
    for line in restored.into_iter().filter(|l| l.quantity > 0) {
        if let Some(existing) = lines.iter_mut().find(|l| l.product.id == line.product.id) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            lines.push(line);
        }
    }
    lines
}
