//! Core types for the Al-Fath storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod status;

pub use id::*;
pub use order::{DeliveryAddress, Order, OrderItem};
pub use price::{CurrencyCode, Price};
pub use product::{Category, Product, SubcategoryRef};
pub use status::*;
