//! REST client for the storefront backend.
//!
//! # Conventions
//!
//! Every endpoint answers with a `{success, data}` envelope. A response only
//! counts as successful when the HTTP status is 2xx, the body parses, `success`
//! is `true` and `data` is present; anything else is an [`ApiError`].
//!
//! The client does not fall back to seed data itself. That is the job of
//! [`crate::catalog::CatalogService`], which decides per endpoint what the
//! fallback is.

pub mod types;

use std::sync::Arc;
use std::time::Duration;

use alfath_core::{Category, Order, Product, ProductId, SubcategoryId};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ApiConfig;
pub use types::{Envelope, OrderRequest, SignupRequest};

/// How much of an error body is kept for diagnostics.
const ERROR_BODY_PREVIEW: usize = 200;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection refused, timeout, TLS...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Envelope reported failure or carried no data.
    #[error("Unsuccessful response: {0}")]
    Unsuccessful(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot take path segments.
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// HTTP status code when the backend answered with one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Client for the storefront REST API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build or the base URL cannot
    /// be extended with path segments.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        if config.base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build `<base>/<segments...>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET an envelope and return its data.
    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!(%url, "GET");
        let response = self.inner.client.get(url).send().await?;
        let body = read_success_body(response).await?;
        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        envelope.into_data()
    }

    /// POST a JSON body and return the raw response text.
    async fn post<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> Result<String, ApiError> {
        debug!(%url, "POST");
        let response = self.inner.client.post(url).json(body).send().await?;
        read_success_body(response).await
    }

    /// `GET /products`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the envelope is unsuccessful.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        self.get(self.endpoint(&["products"])?).await
    }

    /// `GET /products/{id}`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the envelope is unsuccessful.
    #[instrument(skip(self))]
    pub async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        let id = id.to_string();
        self.get(self.endpoint(&["products", &id])?).await
    }

    /// `GET /products/category/{name}`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the envelope is unsuccessful.
    #[instrument(skip(self))]
    pub async fn products_by_category(&self, name: &str) -> Result<Vec<Product>, ApiError> {
        self.get(self.endpoint(&["products", "category", name])?)
            .await
    }

    /// `GET /products/subcategory/{id}`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the envelope is unsuccessful.
    #[instrument(skip(self))]
    pub async fn products_by_subcategory(
        &self,
        id: &SubcategoryId,
    ) -> Result<Vec<Product>, ApiError> {
        self.get(self.endpoint(&["products", "subcategory", id.as_str()])?)
            .await
    }

    /// `GET /products/featured`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the envelope is unsuccessful.
    #[instrument(skip(self))]
    pub async fn featured(&self) -> Result<Vec<Product>, ApiError> {
        self.get(self.endpoint(&["products", "featured"])?).await
    }

    /// `GET /products/bestsellers`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the envelope is unsuccessful.
    #[instrument(skip(self))]
    pub async fn best_sellers(&self) -> Result<Vec<Product>, ApiError> {
        self.get(self.endpoint(&["products", "bestsellers"])?)
            .await
    }

    /// `GET /products/onsale`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the envelope is unsuccessful.
    #[instrument(skip(self))]
    pub async fn on_sale(&self) -> Result<Vec<Product>, ApiError> {
        self.get(self.endpoint(&["products", "onsale"])?).await
    }

    /// `GET /products/search?q=`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the envelope is unsuccessful.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        let mut url = self.endpoint(&["products", "search"])?;
        url.query_pairs_mut().append_pair("q", query);
        self.get(url).await
    }

    /// `GET /categories`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the envelope is unsuccessful.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get(self.endpoint(&["categories"])?).await
    }

    /// `POST /orders`
    ///
    /// Returns the created order when the backend echoes one back, `None` when
    /// it only acknowledges the submission.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails, the status is not 2xx, the
    /// envelope reports failure, or the echoed order cannot be parsed.
    #[instrument(skip(self, order), fields(items = order.items.len()))]
    pub async fn create_order(&self, order: &OrderRequest) -> Result<Option<Order>, ApiError> {
        let body = self.post(self.endpoint(&["orders"])?, order).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        let envelope: Envelope<serde_json::Value> = serde_json::from_str(&body)?;
        if !envelope.success {
            return Err(ApiError::Unsuccessful(envelope.failure_message()));
        }

        created_order(envelope.data)
    }

    /// `POST /signup`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` carrying the HTTP status when the backend
    /// rejects the sign-up, or another variant if the request fails.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn signup(&self, request: &SignupRequest) -> Result<(), ApiError> {
        self.post(self.endpoint(&["signup"])?, request).await?;
        Ok(())
    }
}

/// The order carried by a successful `POST /orders` envelope.
///
/// Data without an `_id` is an acknowledgement and yields `None`. Data with
/// an id must parse as an [`Order`].
fn created_order(data: Option<serde_json::Value>) -> Result<Option<Order>, ApiError> {
    let Some(data) = data else {
        return Ok(None);
    };
    let has_id = data
        .get("_id")
        .or_else(|| data.get("id"))
        .is_some_and(|id| !id.is_null());
    if !has_id {
        debug!("Order response carried no order id");
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(data)?))
}

fn body_preview(body: &str) -> String {
    body.chars().take(ERROR_BODY_PREVIEW).collect()
}

/// Return the body of a 2xx response, or `ApiError::Status` with a preview of
/// the body otherwise.
async fn read_success_body(response: reqwest::Response) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::warn!(
            status = %status,
            body = %body_preview(&body),
            "Backend returned non-success status"
        );
        return Err(ApiError::Status {
            status: status.as_u16(),
            message: body_preview(&body),
        });
    }

    Ok(body)
}
