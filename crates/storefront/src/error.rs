//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that front ends report through
//! [`AppError::capture`] before showing [`AppError::user_message`].

use thiserror::Error;

use crate::account::SignupError;
use crate::api::ApiError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;

const GENERIC_MESSAGE: &str = "حدث خطأ غير متوقع. يرجى المحاولة مرة أخرى.";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Backend API operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    #[error("Sign-up error: {0}")]
    Signup(#[from] SignupError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Whether this is a fault on our side rather than a user mistake.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        match self {
            Self::Config(_) | Self::Api(_) => true,
            Self::Checkout(err) => matches!(err, CheckoutError::Submission(_)),
            Self::Signup(err) => matches!(err, SignupError::Request(_)),
            Self::NotFound(_) => false,
        }
    }

    /// Report server-side failures to Sentry and the log.
    pub fn capture(&self) {
        if self.is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Command error"
            );
        } else {
            tracing::debug!(error = %self, "User error");
        }
    }

    /// Localized message suitable for showing to the customer.
    ///
    /// Internal details are never exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Checkout(err) => err.user_message().to_string(),
            Self::Signup(err) => err.user_message().to_string(),
            Self::NotFound(what) => format!("غير موجود: {what}"),
            Self::Config(_) | Self::Api(_) => GENERIC_MESSAGE.to_string(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added product", Some(&[("product_id", "1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    sentry::add_breadcrumb(breadcrumb(category, message, data));
}

fn breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) -> sentry::Breadcrumb {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    breadcrumb
}
