//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices are whole or fractional Egyptian pounds. Amounts stay as
//! [`Decimal`] everywhere so totals never accumulate float error.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (pounds, not piastres).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the store currency.
    #[must_use]
    pub const fn egp(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::EGP)
    }

    /// Format for display, e.g. `"45 ج.م"` or `"12.5 ج.م"`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} {}", self.amount.normalize(), self.currency_code.symbol())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    EGP,
    USD,
}

impl CurrencyCode {
    /// Display symbol placed after the amount.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::EGP => "ج.م",
            Self::USD => "$",
        }
    }

    /// Three-letter code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::EGP => "EGP",
            Self::USD => "USD",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_strips_trailing_zeros() {
        assert_eq!(Price::egp(Decimal::new(4500, 2)).display(), "45 ج.م");
        assert_eq!(Price::egp(Decimal::new(125, 1)).display(), "12.5 ج.م");
    }

    #[test]
    fn test_default_currency_is_egp() {
        assert_eq!(CurrencyCode::default(), CurrencyCode::EGP);
        assert_eq!(CurrencyCode::EGP.code(), "EGP");
    }
}
