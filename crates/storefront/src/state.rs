//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;
use tower_sessions::Session;

use advanced_cart_core::CurrentCartResolver;

use crate::config::StorefrontConfig;
use crate::db::PgCartStore;
use crate::services::{SessionCartIds, SettingsService};

/// Resolver over the database and the visitor's session.
pub type CartResolver = CurrentCartResolver<PgCartStore, SessionCartIds>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    carts: PgCartStore,
    settings: SettingsService,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let carts = PgCartStore::new(pool.clone());
        let settings = SettingsService::new(pool.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                carts,
                settings,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn settings(&self) -> &SettingsService {
        &self.inner.settings
    }

    /// A fresh resolver for one request.
    ///
    /// Resolvers cache per request only, so each request starts from the
    /// current database state.
    #[must_use]
    pub fn resolver(&self, session: Session) -> CartResolver {
        CurrentCartResolver::new(self.inner.carts.clone(), SessionCartIds::new(session))
    }
}
