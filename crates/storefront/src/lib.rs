//! Al-Fath storefront library.
//!
//! Client-side state and services for the Al-Fath household-goods store: a
//! persisted cart and wishlist, a catalog with seed fallback, checkout and
//! sign-up against the store's REST backend.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod account;
pub mod api;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;
pub mod stores;
