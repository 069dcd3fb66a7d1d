//! Integration tests for the Al-Fath storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p alfath-integration-tests
//! ```
//!
//! Each test starts a [`MockBackend`]: an in-process `axum` server on an
//! ephemeral loopback port that speaks the storefront REST API, records what
//! it receives, and can be switched into failure modes.
//!
//! # Test Categories
//!
//! - `catalog` - Remote reads, fallback and caching
//! - `checkout` - Order submission and cart clearing
//! - `signup` - Account creation and status mapping
//! - `persistence` - Cart and wishlist surviving restarts

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use alfath_storefront::config::StorefrontConfig;
use alfath_storefront::state::AppState;
use alfath_storefront::storage::{KeyValueStore, MemoryStore};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// How the mock answers every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Behavior {
    /// Successful envelopes.
    Healthy,
    /// HTTP 200 with `success: false`.
    Unsuccessful,
    /// The given HTTP status with a plain-text body.
    Status(u16),
}

/// How `POST /orders` answers when healthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderReply {
    /// An envelope carrying the created order.
    Echo,
    /// 201 with an empty body.
    Empty,
    /// An envelope whose order carries an id but an unreadable total.
    Malformed,
}

/// Order id the mock assigns to created orders.
pub const MOCK_ORDER_ID: &str = "665f1c2ab7e4";

/// Username the mock treats as already registered.
pub const TAKEN_USERNAME: &str = "taken";

#[derive(Debug)]
struct MockState {
    products: Vec<Value>,
    categories: Vec<Value>,
    behavior: Mutex<Behavior>,
    order_reply: Mutex<OrderReply>,
    orders: Mutex<Vec<Value>>,
    signups: Mutex<Vec<Value>>,
    requests: Mutex<Vec<String>>,
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockState {
    fn record(&self, request: String) {
        lock(&self.requests).push(request);
    }

    /// Wrap `data` per the current behavior.
    fn reply(&self, data: Value) -> Response {
        match lock(&self.behavior).clone() {
            Behavior::Healthy => Json(json!({"success": true, "data": data})).into_response(),
            Behavior::Unsuccessful => {
                Json(json!({"success": false, "message": "maintenance"})).into_response()
            }
            Behavior::Status(code) => (
                StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                "mock failure",
            )
                .into_response(),
        }
    }

    fn products_where(&self, keep: impl Fn(&Value) -> bool) -> Value {
        Value::Array(self.products.iter().filter(|p| keep(p)).cloned().collect())
    }
}

/// An in-process storefront backend.
///
/// The server task is aborted on drop.
pub struct MockBackend {
    base_url: Url,
    state: Arc<MockState>,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Start a backend serving [`sample_products`] and [`sample_categories`].
    ///
    /// # Errors
    ///
    /// Returns an error if the loopback listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let state = Arc::new(MockState {
            products: sample_products(),
            categories: sample_categories(),
            behavior: Mutex::new(Behavior::Healthy),
            order_reply: Mutex::new(OrderReply::Echo),
            orders: Mutex::new(Vec::new()),
            signups: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        });

        let api = Router::new()
            .route("/products", get(list_products))
            .route("/products/featured", get(featured))
            .route("/products/bestsellers", get(best_sellers))
            .route("/products/onsale", get(on_sale))
            .route("/products/search", get(search))
            .route("/products/category/{name}", get(by_category))
            .route("/products/subcategory/{id}", get(by_subcategory))
            .route("/products/{id}", get(product))
            .route("/categories", get(categories))
            .route("/orders", post(create_order))
            .route("/signup", post(signup))
            .with_state(Arc::clone(&state));
        let app = Router::new().nest("/api", api);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let base_url = Url::parse(&format!("http://{addr}/api"))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        Ok(Self {
            base_url,
            state,
            server,
        })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn set_behavior(&self, behavior: Behavior) {
        *lock(&self.state.behavior) = behavior;
    }

    pub fn set_order_reply(&self, reply: OrderReply) {
        *lock(&self.state.order_reply) = reply;
    }

    /// Bodies received by `POST /orders`.
    #[must_use]
    pub fn orders(&self) -> Vec<Value> {
        lock(&self.state.orders).clone()
    }

    /// Bodies received by `POST /signup`.
    #[must_use]
    pub fn signups(&self) -> Vec<Value> {
        lock(&self.state.signups).clone()
    }

    /// Every request seen, as `"<route> <argument>"`.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        lock(&self.state.requests).clone()
    }

    /// Storefront configuration pointing at this backend.
    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        StorefrontConfig::for_api(self.base_url.clone())
    }

    /// App state over this backend with in-memory storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built.
    pub fn app_state(&self) -> Result<AppState, alfath_storefront::api::ApiError> {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        AppState::with_storage(self.config(), storage)
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// A base URL nothing listens on.
///
/// # Errors
///
/// Returns an error if no loopback port can be reserved.
pub async fn unreachable_base_url() -> std::io::Result<Url> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Url::parse(&format!("http://{addr}/api"))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_products(State(state): State<Arc<MockState>>) -> Response {
    state.record("products".to_string());
    state.reply(state.products_where(|_| true))
}

async fn featured(State(state): State<Arc<MockState>>) -> Response {
    state.record("featured".to_string());
    state.reply(state.products_where(|p| p["rating"].as_f64() >= Some(4.5)))
}

async fn best_sellers(State(state): State<Arc<MockState>>) -> Response {
    state.record("bestsellers".to_string());
    state.reply(state.products_where(|p| p["reviews"].as_u64() >= Some(100)))
}

async fn on_sale(State(state): State<Arc<MockState>>) -> Response {
    state.record("onsale".to_string());
    state.reply(state.products_where(|p| p["isOnSale"] == json!(true)))
}

async fn search(
    State(state): State<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let q = params.get("q").cloned().unwrap_or_default();
    state.record(format!("search {q}"));
    let needle = q.to_lowercase();
    state.reply(state.products_where(|p| {
        p["name"]
            .as_str()
            .is_some_and(|name| name.to_lowercase().contains(&needle))
    }))
}

async fn by_category(State(state): State<Arc<MockState>>, Path(name): Path<String>) -> Response {
    state.record(format!("category {name}"));
    state.reply(state.products_where(|p| p["category"] == json!(name)))
}

async fn by_subcategory(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    state.record(format!("subcategory {id}"));
    state.reply(state.products_where(|p| p["subCategoryId"] == json!(id)))
}

async fn product(State(state): State<Arc<MockState>>, Path(id): Path<i64>) -> Response {
    state.record(format!("product {id}"));
    match state.products.iter().find(|p| p["id"] == json!(id)) {
        Some(found) => state.reply(found.clone()),
        None => (StatusCode::NOT_FOUND, "no such product").into_response(),
    }
}

async fn categories(State(state): State<Arc<MockState>>) -> Response {
    state.record("categories".to_string());
    state.reply(Value::Array(state.categories.clone()))
}

async fn create_order(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.record("orders".to_string());
    lock(&state.orders).push(body.clone());

    if *lock(&state.behavior) != Behavior::Healthy {
        return state.reply(Value::Null);
    }
    match *lock(&state.order_reply) {
        OrderReply::Empty => StatusCode::CREATED.into_response(),
        OrderReply::Echo => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "data": {
                    "_id": MOCK_ORDER_ID,
                    "items": body["items"],
                    "totalAmount": body["totalAmount"],
                    "status": "pending",
                    "paymentMethod": "cash",
                    "deliveryAddress": body["address"],
                    "orderDate": "2026-06-01T10:00:00Z"
                }
            })),
        )
            .into_response(),
        OrderReply::Malformed => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "data": {"_id": MOCK_ORDER_ID, "totalAmount": "unknown"}
            })),
        )
            .into_response(),
    }
}

async fn signup(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.record("signup".to_string());
    lock(&state.signups).push(body.clone());

    if body["username"] == json!(TAKEN_USERNAME) {
        return (StatusCode::CONFLICT, "user exists").into_response();
    }
    if *lock(&state.behavior) != Behavior::Healthy {
        return state.reply(Value::Null);
    }
    (StatusCode::CREATED, Json(json!({"success": true}))).into_response()
}

// =============================================================================
// Fixtures
// =============================================================================

/// Products the mock serves. Ids start at 101 so they never collide with the
/// seed catalog.
#[must_use]
pub fn sample_products() -> Vec<Value> {
    vec![
        json!({
            "id": 101,
            "name": "Lavender Floor Cleaner",
            "description": "Floor cleaner with lavender scent",
            "price": 45,
            "originalPrice": 60,
            "image": "https://cdn.example/101.jpg",
            "category": "منظفات",
            "subCategory": "منظفات الأرضيات",
            "subCategoryId": "1",
            "brand": "Fresh",
            "inStock": true,
            "rating": 4.7,
            "reviews": 210,
            "isOnSale": true,
            "discountPercentage": 25
        }),
        json!({
            "id": 102,
            "name": "Dish Soap",
            "description": "Cuts grease fast",
            "price": 35,
            "image": "https://cdn.example/102.jpg",
            "category": "منظفات",
            "subCategory": "منظفات المطبخ",
            "subCategoryId": "2",
            "brand": "Fairy",
            "inStock": true,
            "rating": 4.2,
            "reviews": 80,
            "isOnSale": false
        }),
        json!({
            "id": 103,
            "name": "Steel Frying Pan",
            "description": "28cm pan",
            "price": 250,
            "image": "https://cdn.example/103.jpg",
            "category": "أدوات مطبخ",
            "subCategory": "أدوات المطبخ",
            "subCategoryId": "6",
            "brand": "Tefal",
            "inStock": false,
            "rating": 4.9,
            "reviews": 12,
            "isOnSale": false
        }),
    ]
}

/// Categories the mock serves, with populated and bare subcategory refs.
#[must_use]
pub fn sample_categories() -> Vec<Value> {
    vec![
        json!({
            "_id": "c1",
            "name": "منظفات",
            "description": "منظفات منزلية",
            "subcategories": [{"_id": "1", "name": "منظفات الأرضيات"}, "2"]
        }),
        json!({
            "_id": "c2",
            "name": "أدوات مطبخ",
            "description": "أدوات الطبخ",
            "subcategories": ["6"]
        }),
        json!({
            "_id": "c3",
            "name": "عروض",
            "description": "بدون فئات فرعية",
            "subcategories": []
        }),
    ]
}
