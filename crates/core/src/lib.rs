//! Al-Fath Core - Shared domain types.
//!
//! This crate provides the types used across all Al-Fath storefront components:
//! - `storefront` - Cart/wishlist stores, catalog service, checkout and sign-up
//! - `cli` - Command-line front end over the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, statuses, catalog and order entities
//! - [`pricing`] - Cart lines and totals derived from them

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod pricing;
pub mod types;

pub use pricing::{CartLine, CartTotals};
pub use types::*;
