//! Integration tests for catalog reads against the mock backend.

#![allow(clippy::indexing_slicing)]

use alfath_core::ProductId;
use alfath_integration_tests::{Behavior, MockBackend, unreachable_base_url};
use alfath_storefront::catalog::{Origin, ProductQuery, SortKey};
use alfath_storefront::config::StorefrontConfig;
use alfath_storefront::state::AppState;
use alfath_storefront::storage::MemoryStore;
use std::sync::Arc;

fn ids(products: &[alfath_core::Product]) -> Vec<i64> {
    products.iter().map(|p| p.id.as_i64()).collect()
}

// =============================================================================
// Remote Reads
// =============================================================================

#[tokio::test]
async fn test_products_come_from_backend() {
    let backend = MockBackend::start().await.expect("mock backend should start");
    let state = backend.app_state().expect("state should build");

    let products = state.catalog().products().await;
    assert_eq!(products.origin, Origin::Remote);
    assert_eq!(ids(&products.value), [101, 102, 103]);
}

#[tokio::test]
async fn test_highlight_endpoints() {
    let backend = MockBackend::start().await.expect("mock backend should start");
    let state = backend.app_state().expect("state should build");

    assert_eq!(ids(&state.catalog().featured().await.value), [101, 103]);
    assert_eq!(ids(&state.catalog().best_sellers().await.value), [101]);
    assert_eq!(ids(&state.catalog().on_sale().await.value), [101]);
}

#[tokio::test]
async fn test_category_name_is_percent_encoded() {
    let backend = MockBackend::start().await.expect("mock backend should start");
    let state = backend.app_state().expect("state should build");

    let products = state.catalog().products_by_category("أدوات مطبخ").await;
    assert_eq!(products.origin, Origin::Remote);
    assert_eq!(ids(&products.value), [103]);
    assert!(backend.requests().contains(&"category أدوات مطبخ".to_string()));
}

#[tokio::test]
async fn test_search_passes_query_parameter() {
    let backend = MockBackend::start().await.expect("mock backend should start");
    let state = backend.app_state().expect("state should build");

    let found = state.catalog().search("floor cleaner").await;
    assert_eq!(ids(&found.value), [101]);
    assert!(backend.requests().contains(&"search floor cleaner".to_string()));
}

#[tokio::test]
async fn test_product_by_id_and_subcategory() {
    let backend = MockBackend::start().await.expect("mock backend should start");
    let state = backend.app_state().expect("state should build");

    let product = state.catalog().product(ProductId::new(102)).await;
    assert_eq!(product.origin, Origin::Remote);
    assert_eq!(product.value.expect("product should exist").name, "Dish Soap");

    let by_sub = state
        .catalog()
        .products_by_subcategory(&"6".into())
        .await;
    assert_eq!(ids(&by_sub.value), [103]);
}

#[tokio::test]
async fn test_categories_with_mixed_subcategory_refs() {
    let backend = MockBackend::start().await.expect("mock backend should start");
    let state = backend.app_state().expect("state should build");

    let categories = state.catalog().categories().await;
    assert_eq!(categories.origin, Origin::Remote);
    assert_eq!(categories.value.len(), 3);
    assert_eq!(categories.value[0].subcategories.len(), 2);
    assert_eq!(
        categories.value[0].subcategories[0].name(),
        Some("منظفات الأرضيات")
    );
}

#[tokio::test]
async fn test_browse_filters_remote_products() {
    let backend = MockBackend::start().await.expect("mock backend should start");
    let state = backend.app_state().expect("state should build");

    let query = ProductQuery::new()
        .category_name("منظفات")
        .sort(SortKey::PriceLow);
    let view = state.catalog().browse(&query).await;
    assert_eq!(ids(&view.value), [102, 101]);
}

// =============================================================================
// Fallback
// =============================================================================

#[tokio::test]
async fn test_unsuccessful_envelope_falls_back_to_seed() {
    let backend = MockBackend::start().await.expect("mock backend should start");
    backend.set_behavior(Behavior::Unsuccessful);
    let state = backend.app_state().expect("state should build");

    let products = state.catalog().products().await;
    assert!(products.is_fallback());
    assert_eq!(ids(&products.value), [1, 2]);
    match products.origin {
        Origin::Fallback { reason } => assert!(reason.contains("maintenance")),
        Origin::Remote => panic!("expected fallback"),
    }
}

#[tokio::test]
async fn test_server_error_falls_back_to_seed() {
    let backend = MockBackend::start().await.expect("mock backend should start");
    backend.set_behavior(Behavior::Status(500));
    let state = backend.app_state().expect("state should build");

    let categories = state.catalog().categories().await;
    assert!(categories.is_fallback());
    assert_eq!(categories.value.len(), 3);

    let missing = state.catalog().product(ProductId::new(102)).await;
    assert!(missing.is_fallback());
    assert!(missing.value.is_none());
}

#[tokio::test]
async fn test_unreachable_backend_falls_back_to_seed() {
    let url = unreachable_base_url().await.expect("port should be reserved");
    let state = AppState::with_storage(StorefrontConfig::for_api(url), Arc::new(MemoryStore::new()))
        .expect("state should build");

    let featured = state.catalog().featured().await;
    assert!(featured.is_fallback());
    assert_eq!(ids(&featured.value), [1]);

    let by_sub = state.catalog().products_by_subcategory(&"1".into()).await;
    assert!(by_sub.is_fallback());
    assert!(by_sub.value.is_empty());

    let found = state.catalog().search("لافندر").await;
    assert_eq!(ids(&found.value), [1]);
}

// =============================================================================
// Caching
// =============================================================================

#[tokio::test]
async fn test_remote_results_are_cached() {
    let backend = MockBackend::start().await.expect("mock backend should start");
    let state = backend.app_state().expect("state should build");

    let first = state.catalog().products().await;
    backend.set_behavior(Behavior::Status(503));
    let second = state.catalog().products().await;

    assert_eq!(first, second);
    assert_eq!(
        backend.requests().iter().filter(|r| *r == "products").count(),
        1
    );

    state.catalog().invalidate_cache();
    assert!(state.catalog().products().await.is_fallback());
}

#[tokio::test]
async fn test_fallbacks_are_not_cached() {
    let backend = MockBackend::start().await.expect("mock backend should start");
    backend.set_behavior(Behavior::Status(503));
    let state = backend.app_state().expect("state should build");

    assert!(state.catalog().on_sale().await.is_fallback());
    backend.set_behavior(Behavior::Healthy);
    assert_eq!(state.catalog().on_sale().await.origin, Origin::Remote);
}
