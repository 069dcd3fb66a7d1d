//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//! - `ALFATH_API_URL` - Backend REST base URL (default: `http://localhost:3000/api`)
//! - `ALFATH_DATA_DIR` - Directory holding the cart and wishlist snapshots (default: `.alfath`)
//! - `ALFATH_DELIVERY_FEE` - Flat delivery fee added at checkout (default: 20)
//! - `ALFATH_REQUEST_TIMEOUT_SECS` - Backend request timeout (default: 10)
//! - `ALFATH_CACHE_TTL_SECS` - How long catalog responses stay cached (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:3000/api";
const DEFAULT_DATA_DIR: &str = ".alfath";
const DEFAULT_DELIVERY_FEE: u32 = 20;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend API configuration
    pub api: ApiConfig,
    /// Directory for persisted client state
    pub data_dir: PathBuf,
    /// Flat delivery fee charged per order
    pub delivery_fee: Decimal,
    /// Catalog cache time-to-live
    pub cache_ttl: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Backend REST API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: Url,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl StorefrontConfig {
    /// Configuration for the backend at `base_url` with every other setting
    /// at its default.
    #[must_use]
    pub fn for_api(base_url: Url) -> Self {
        Self {
            api: ApiConfig {
                base_url,
                request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            },
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            delivery_fee: Decimal::from(DEFAULT_DELIVERY_FEE),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api = ApiConfig::from_env()?;
        let data_dir = PathBuf::from(get_env_or_default("ALFATH_DATA_DIR", DEFAULT_DATA_DIR));
        let delivery_fee = match get_optional_env("ALFATH_DELIVERY_FEE") {
            Some(raw) => parse_delivery_fee(&raw)?,
            None => Decimal::from(DEFAULT_DELIVERY_FEE),
        };
        let cache_ttl = Duration::from_secs(
            get_optional_env("ALFATH_CACHE_TTL_SECS")
                .map(|raw| parse_value("ALFATH_CACHE_TTL_SECS", &raw))
                .transpose()?
                .unwrap_or(DEFAULT_CACHE_TTL_SECS),
        );

        Ok(Self {
            api,
            data_dir,
            delivery_fee,
            cache_ttl,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }
}

impl ApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let request_timeout_secs = get_optional_env("ALFATH_REQUEST_TIMEOUT_SECS")
            .map(|raw| parse_value("ALFATH_REQUEST_TIMEOUT_SECS", &raw))
            .transpose()?
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Ok(Self {
            base_url: parse_api_url(&get_env_or_default("ALFATH_API_URL", DEFAULT_API_URL))?,
            request_timeout_secs,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse a raw value read from `key`.
fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse the API base URL, which must be able to take path segments.
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url: Url = parse_value("ALFATH_API_URL", raw)?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            "ALFATH_API_URL".to_string(),
            format!("{raw} is not an http(s) base URL"),
        ));
    }
    Ok(url)
}

/// Parse the delivery fee, which must not be negative.
fn parse_delivery_fee(raw: &str) -> Result<Decimal, ConfigError> {
    let fee: Decimal = parse_value("ALFATH_DELIVERY_FEE", raw)?;
    if fee.is_sign_negative() && !fee.is_zero() {
        return Err(ConfigError::InvalidEnvVar(
            "ALFATH_DELIVERY_FEE".to_string(),
            format!("must not be negative (got {fee})"),
        ));
    }
    Ok(fee)
}
