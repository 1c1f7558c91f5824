//! Settings database operations.
//!
//! Settings are named JSON objects in `commerce_settings`.

use serde_json::Value as JsonValue;
use sqlx::PgPool;

use crate::models::settings::{CART_SETTINGS_NAME, CartSettings};

/// Error type for settings operations.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Get a setting object by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn get_setting(pool: &PgPool, name: &str) -> Result<Option<JsonValue>, SettingsError> {
    let result = sqlx::query_scalar::<_, JsonValue>(
        r"
        SELECT data FROM commerce_settings
        WHERE name = $1
        ",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(result)
}

/// Set a setting object by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn set_setting(pool: &PgPool, name: &str, data: &JsonValue) -> Result<(), SettingsError> {
    sqlx::query(
        r"
        INSERT INTO commerce_settings (name, data)
        VALUES ($1, $2)
        ON CONFLICT (name) DO UPDATE SET data = $2, updated_at = NOW()
        ",
    )
    .bind(name)
    .bind(data)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load the cart settings, falling back to defaults when none are stored.
///
/// # Errors
///
/// Returns an error if the query fails or the stored object is malformed.
pub async fn get_cart_settings(pool: &PgPool) -> Result<CartSettings, SettingsError> {
    match get_setting(pool, CART_SETTINGS_NAME).await? {
        Some(data) => Ok(serde_json::from_value(data)?),
        None => Ok(CartSettings::default()),
    }
}

/// Store the cart settings.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn set_cart_settings(pool: &PgPool, settings: &CartSettings) -> Result<(), SettingsError> {
    let data = serde_json::to_value(settings)?;
    set_setting(pool, CART_SETTINGS_NAME, &data).await
}
