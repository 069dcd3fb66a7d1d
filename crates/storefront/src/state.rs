//! Application state shared across commands.

use std::sync::Arc;

use alfath_core::Order;

use crate::account::{self, SignupError, SignupForm};
use crate::api::{ApiClient, ApiError};
use crate::catalog::{CatalogService, FallbackCatalog};
use crate::checkout::{self, CheckoutError, CheckoutSummary, DeliveryInfo};
use crate::config::StorefrontConfig;
use crate::storage::{FileStore, KeyValueStore};
use crate::stores::{CartStore, WishlistStore};

/// Application state shared across all commands.
///
/// This struct is cheaply cloneable via `Arc`. It owns the cart and wishlist
/// stores; dropping the last clone tears them down and closes their
/// subscriptions.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    catalog: CatalogService,
    cart: CartStore,
    wishlist: WishlistStore,
}

impl AppState {
    /// Create state persisting the cart and wishlist under `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let storage = Arc::new(FileStore::new(config.data_dir.clone()));
        Self::with_storage(config, storage)
    }

    /// Create state over an explicit storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built.
    pub fn with_storage(
        config: StorefrontConfig,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api)?;
        let catalog = CatalogService::new(api.clone(), FallbackCatalog::seed(), config.cache_ttl);
        let cart = CartStore::new(Arc::clone(&storage));
        let wishlist = WishlistStore::new(storage);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                catalog,
                cart,
                wishlist,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    #[must_use]
    pub fn wishlist(&self) -> &WishlistStore {
        &self.inner.wishlist
    }

    /// Totals for the current cart including the configured delivery fee.
    #[must_use]
    pub fn checkout_summary(&self) -> CheckoutSummary {
        CheckoutSummary::compute(&self.inner.cart.lines(), self.inner.config.delivery_fee)
    }

    /// Place an order for the current cart.
    ///
    /// # Errors
    ///
    /// See [`checkout::place_order`].
    pub async fn place_order(&self, info: &DeliveryInfo) -> Result<Order, CheckoutError> {
        checkout::place_order(
            &self.inner.api,
            &self.inner.cart,
            info,
            self.inner.config.delivery_fee,
        )
        .await
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// See [`account::sign_up`].
    pub async fn sign_up(&self, form: &SignupForm) -> Result<(), SignupError> {
        account::sign_up(&self.inner.api, form).await
    }
}
