//! Cached cart settings.
//!
//! Reads go through a short-lived moka cache. Writes made by the CLI show up
//! once the entry expires.

use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::{debug, instrument};

use crate::db::settings::{self as settings_db, SettingsError};
use crate::models::settings::{CART_SETTINGS_NAME, CartSettings};

const SETTINGS_TTL: Duration = Duration::from_secs(60);

/// Cached reader for [`CartSettings`].
#[derive(Clone)]
pub struct SettingsService {
    pool: PgPool,
    cache: Cache<&'static str, CartSettings>,
}

impl SettingsService {
    /// Create a settings service over the pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(SETTINGS_TTL)
            .build();

        Self { pool, cache }
    }

    /// Current cart settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be loaded.
    #[instrument(skip(self))]
    pub async fn cart_settings(&self) -> Result<CartSettings, SettingsError> {
        if let Some(settings) = self.cache.get(CART_SETTINGS_NAME).await {
            debug!("Cache hit for cart settings");
            return Ok(settings);
        }

        let settings = settings_db::get_cart_settings(&self.pool).await?;
        self.cache.insert(CART_SETTINGS_NAME, settings).await;
        Ok(settings)
    }
}

impl std::fmt::Debug for SettingsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsService")
            .field("cached_entries", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}
