//! Product catalog with a two-tier data source.
//!
//! Every read goes to the backend first. When the backend is unreachable or
//! answers with anything but a successful envelope, the built-in seed catalog
//! answers instead and the result is tagged [`Origin::Fallback`] with the
//! reason. Remote successes are cached in memory via `moka`.

mod cache;
pub mod fallback;
pub mod query;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alfath_core::{Category, Product, ProductId, SubcategoryId, SubcategoryRef};
use moka::future::Cache;
use tracing::{debug, instrument, warn};

use crate::api::{ApiClient, ApiError};
use cache::{CacheKey, CacheValue};
pub use fallback::{FallbackCatalog, subcategory_name, subcategory_product_count};
pub use query::{ProductQuery, SortKey, filter_categories, search_products};

const CACHE_CAPACITY: u64 = 1000;

/// Where a catalog result came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// The backend answered successfully (possibly from cache).
    Remote,
    /// The seed catalog answered because the backend request failed.
    Fallback { reason: String },
}

/// A catalog result tagged with its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    pub value: T,
    pub origin: Origin,
}

impl<T> Sourced<T> {
    #[must_use]
    pub const fn remote(value: T) -> Self {
        Self {
            value,
            origin: Origin::Remote,
        }
    }

    #[must_use]
    pub const fn fallback(value: T, reason: String) -> Self {
        Self {
            value,
            origin: Origin::Fallback { reason },
        }
    }

    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self.origin, Origin::Fallback { .. })
    }

    /// Transform the value, keeping the origin.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            value: f(self.value),
            origin: self.origin,
        }
    }
}

/// Display name for a subcategory reference.
///
/// Uses the populated name when present, the static name table otherwise.
#[must_use]
pub fn subcategory_label(sub: &SubcategoryRef) -> String {
    sub.name()
        .map_or_else(|| subcategory_name(sub.id()).to_string(), str::to_string)
}

/// Catalog reads over the backend with seed fallback.
///
/// Cheap to clone; clones share the cache.
#[derive(Clone)]
pub struct CatalogService {
    inner: Arc<CatalogServiceInner>,
}

struct CatalogServiceInner {
    api: ApiClient,
    fallback: FallbackCatalog,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogService {
    /// Create a catalog service caching remote results for `cache_ttl`.
    #[must_use]
    pub fn new(api: ApiClient, fallback: FallbackCatalog, cache_ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(cache_ttl)
            .build();

        Self {
            inner: Arc::new(CatalogServiceInner {
                api,
                fallback,
                cache,
            }),
        }
    }

    /// The seed catalog used for fallbacks.
    #[must_use]
    pub fn fallback_catalog(&self) -> &FallbackCatalog {
        &self.inner.fallback
    }

    /// Drop every cached response.
    pub fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
    }

    /// Serve `key` from cache, else `fetch`, else the seed catalog.
    async fn sourced<T, F>(
        &self,
        key: CacheKey,
        fetch: F,
        wrap: fn(T) -> CacheValue,
        unwrap: fn(CacheValue) -> Option<T>,
        fallback: impl FnOnce(&FallbackCatalog) -> T,
    ) -> Sourced<T>
    where
        T: Clone,
        F: Future<Output = Result<T, ApiError>>,
    {
        if let Some(value) = self.inner.cache.get(&key).await.and_then(unwrap) {
            debug!(?key, "Catalog cache hit");
            return Sourced::remote(value);
        }

        match fetch.await {
            Ok(value) => {
                self.inner.cache.insert(key, wrap(value.clone())).await;
                Sourced::remote(value)
            }
            Err(e) => {
                warn!(?key, error = %e, "Backend unavailable, serving fallback catalog");
                Sourced::fallback(fallback(&self.inner.fallback), e.to_string())
            }
        }
    }

    /// All products.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Sourced<Vec<Product>> {
        self.sourced(
            CacheKey::Products,
            self.inner.api.products(),
            CacheValue::Products,
            CacheValue::into_products,
            FallbackCatalog::products,
        )
        .await
    }

    /// One product by id. `None` only when the seed catalog lacks it.
    #[instrument(skip(self))]
    pub async fn product(&self, id: ProductId) -> Sourced<Option<Product>> {
        let api = &self.inner.api;
        self.sourced(
            CacheKey::Product(id),
            async move { api.product(id).await.map(Some) },
            |p: Option<Product>| CacheValue::Product(p.map(Box::new)),
            CacheValue::into_product,
            |seed| seed.product(id),
        )
        .await
    }

    /// Products whose category label equals `name`.
    #[instrument(skip(self))]
    pub async fn products_by_category(&self, name: &str) -> Sourced<Vec<Product>> {
        self.sourced(
            CacheKey::Category(name.to_string()),
            self.inner.api.products_by_category(name),
            CacheValue::Products,
            CacheValue::into_products,
            |seed| seed.by_category(name),
        )
        .await
    }

    /// Products in a subcategory. The seed catalog has none.
    #[instrument(skip(self))]
    pub async fn products_by_subcategory(&self, id: &SubcategoryId) -> Sourced<Vec<Product>> {
        self.sourced(
            CacheKey::Subcategory(id.clone()),
            self.inner.api.products_by_subcategory(id),
            CacheValue::Products,
            CacheValue::into_products,
            |_| Vec::new(),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn featured(&self) -> Sourced<Vec<Product>> {
        self.sourced(
            CacheKey::Featured,
            self.inner.api.featured(),
            CacheValue::Products,
            CacheValue::into_products,
            FallbackCatalog::featured,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn best_sellers(&self) -> Sourced<Vec<Product>> {
        self.sourced(
            CacheKey::BestSellers,
            self.inner.api.best_sellers(),
            CacheValue::Products,
            CacheValue::into_products,
            FallbackCatalog::best_sellers,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn on_sale(&self) -> Sourced<Vec<Product>> {
        self.sourced(
            CacheKey::OnSale,
            self.inner.api.on_sale(),
            CacheValue::Products,
            CacheValue::into_products,
            FallbackCatalog::on_sale,
        )
        .await
    }

    /// Server-side search, falling back to a text search over the seed.
    #[instrument(skip(self))]
    pub async fn search(&self, term: &str) -> Sourced<Vec<Product>> {
        self.sourced(
            CacheKey::Search(term.to_string()),
            self.inner.api.search(term),
            CacheValue::Products,
            CacheValue::into_products,
            |seed| seed.search(term),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn categories(&self) -> Sourced<Vec<Category>> {
        self.sourced(
            CacheKey::Categories,
            self.inner.api.categories(),
            CacheValue::Categories,
            CacheValue::into_categories,
            FallbackCatalog::categories,
        )
        .await
    }

    /// The listing page: all products narrowed by `query`.
    #[instrument(skip(self))]
    pub async fn browse(&self, query: &ProductQuery) -> Sourced<Vec<Product>> {
        self.products()
            .await
            .map(|products| query.apply(&products))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;

    fn unreachable_service() -> CatalogService {
        // Port 9 (discard) on loopback refuses connections.
        let api = ApiClient::new(&ApiConfig {
            base_url: url::Url::parse("http://127.0.0.1:9/api").unwrap(),
            request_timeout_secs: 1,
        })
        .unwrap();
        CatalogService::new(api, FallbackCatalog::seed(), Duration::from_secs(60))
    }

    #[test]
    fn test_sourced_map_keeps_origin() {
        let sourced = Sourced::fallback(vec![1, 2, 3], "down".to_string());
        let mapped = sourced.map(|v| v.len());
        assert_eq!(mapped.value, 3);
        assert!(mapped.is_fallback());
        assert!(!Sourced::remote(()).is_fallback());
    }

    #[test]
    fn test_subcategory_label() {
        let populated: SubcategoryRef =
            serde_json::from_value(serde_json::json!({"_id": "x", "name": "مكانس"})).unwrap();
        assert_eq!(subcategory_label(&populated), "مكانس");

        let bare = SubcategoryRef::Id(SubcategoryId::new("2"));
        assert_eq!(subcategory_label(&bare), "منظفات المطبخ");
    }

    #[tokio::test]
    async fn test_unreachable_backend_serves_seed() {
        let catalog = unreachable_service();

        let products = catalog.products().await;
        assert!(products.is_fallback());
        assert_eq!(products.value.len(), 2);

        let missing = catalog.product(ProductId::new(99)).await;
        assert!(missing.is_fallback());
        assert!(missing.value.is_none());

        let by_sub = catalog
            .products_by_subcategory(&SubcategoryId::new("1"))
            .await;
        assert!(by_sub.value.is_empty());

        let featured = catalog.featured().await;
        assert_eq!(featured.value.len(), 1);
    }

    #[tokio::test]
    async fn test_browse_applies_query_to_fallback() {
        let catalog = unreachable_service();
        let query = ProductQuery::new().search("أطباق").sort(SortKey::PriceLow);
        let view = catalog.browse(&query).await;
        assert!(view.is_fallback());
        assert_eq!(view.value.len(), 1);
        assert_eq!(view.value[0].id, ProductId::new(2));
    }
}
