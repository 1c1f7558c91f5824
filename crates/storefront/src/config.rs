//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_DEFAULT_STORE_ID` - Store new carts belong to (default: 1)
//! - `STOREFRONT_DEFAULT_ORDER_TYPE` - Order type of new carts (default: `default`)
//! - `CART_FORM_VIEWS` - Views for current carts, e.g. `default=commerce_cart_form,b2b=b2b_cart_form`
//! - `NON_CURRENT_CART_FORM_VIEWS` - Views for non-current carts, same format
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance traces sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

use advanced_cart_core::{OrderType, StoreId};

/// View used for any order type without a configured one.
pub const DEFAULT_CART_FORM_VIEW: &str = "commerce_cart_form";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Cart defaults and view selection
    pub carts: CartConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Cart defaults and per-order-type view selection.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Store new carts are created in when the request names none.
    pub default_store_id: StoreId,
    /// Order type of new carts when the request names none.
    pub default_order_type: OrderType,
    /// Views rendering current carts.
    pub current_views: CartViews,
    /// Views rendering non-current carts.
    pub non_current_views: CartViews,
}

/// The view that renders a cart form, chosen per order type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartViews {
    views: HashMap<OrderType, String>,
    default_view: String,
}

impl Default for CartViews {
    fn default() -> Self {
        Self::new(DEFAULT_CART_FORM_VIEW)
    }
}

impl CartViews {
    /// No per-type views; everything renders with `default_view`.
    #[must_use]
    pub fn new(default_view: impl Into<String>) -> Self {
        Self {
            views: HashMap::new(),
            default_view: default_view.into(),
        }
    }

    /// Parse `type=view` pairs separated by commas.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first malformed pair.
    pub fn parse(value: &str, default_view: &str) -> Result<Self, String> {
        let mut views = Self::new(default_view);
        for pair in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (order_type, view) = pair
                .split_once('=')
                .map(|(t, v)| (t.trim(), v.trim()))
                .filter(|(t, v)| !t.is_empty() && !v.is_empty())
                .ok_or_else(|| format!("expected `order_type=view`, got `{pair}`"))?;
            views.set(OrderType::new(order_type), view);
        }
        Ok(views)
    }

    pub fn set(&mut self, order_type: OrderType, view: impl Into<String>) {
        self.views.insert(order_type, view.into());
    }

    /// The view for an order type.
    #[must_use]
    pub fn view_for(&self, order_type: &OrderType) -> &str {
        self.views
            .get(order_type)
            .map_or(self.default_view.as_str(), String::as_str)
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STOREFRONT_DATABASE_URL")?;
        let host = parse_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("STOREFRONT_PORT", "3000")?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        let carts = CartConfig::from_env()?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            carts,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            default_store_id: StoreId::new(1),
            default_order_type: OrderType::default(),
            current_views: CartViews::default(),
            non_current_views: CartViews::default(),
        }
    }
}

impl CartConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let default_store_id = StoreId::new(parse_env("STOREFRONT_DEFAULT_STORE_ID", "1")?);
        let default_order_type = OrderType::new(get_env_or_default(
            "STOREFRONT_DEFAULT_ORDER_TYPE",
            OrderType::DEFAULT,
        ));

        Ok(Self {
            default_store_id,
            default_order_type,
            current_views: parse_views("CART_FORM_VIEWS")?,
            non_current_views: parse_views("NON_CURRENT_CART_FORM_VIEWS")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_views(key: &str) -> Result<CartViews, ConfigError> {
    let value = get_env_or_default(key, "");
    CartViews::parse(&value, DEFAULT_CART_FORM_VIEW)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e))
}
