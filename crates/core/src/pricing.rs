//! Cart lines and the totals derived from them.
//!
//! Totals are never stored. [`CartTotals::from_lines`] recomputes them from the
//! current lines every time, so they cannot drift from the cart contents.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, Product};

/// A product and how many units of it are in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    /// Always at least 1 while the line is in a cart.
    pub quantity: u32,
}

impl CartLine {
    /// Create a new line.
    #[must_use]
    pub const fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// Discounted unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }

    /// Pre-discount unit price times quantity.
    #[must_use]
    pub fn list_total(&self) -> Decimal {
        self.product.list_price() * Decimal::from(self.quantity)
    }

    /// Savings across all units of this line.
    #[must_use]
    pub fn savings(&self) -> Decimal {
        self.product.unit_savings() * Decimal::from(self.quantity)
    }
}

/// Totals derived from a set of cart lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartTotals {
    /// Sum of quantities.
    pub item_count: u32,
    /// Sum of pre-discount line totals.
    pub subtotal: Decimal,
    /// Sum of savings over discounted lines.
    pub discount: Decimal,
    /// Sum of discounted line totals.
    pub total: Decimal,
}

impl CartTotals {
    /// Compute totals from the given lines.
    #[must_use]
    pub fn from_lines(lines: &[CartLine]) -> Self {
        lines.iter().fold(Self::default(), |acc, line| Self {
            item_count: acc.item_count.saturating_add(line.quantity),
            subtotal: acc.subtotal + line.list_total(),
            discount: acc.discount + line.savings(),
            total: acc.total + line.line_total(),
        })
    }

    /// Total formatted in the store currency.
    #[must_use]
    pub const fn total_price(&self) -> Price {
        Price::egp(self.total)
    }
}
