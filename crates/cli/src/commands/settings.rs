//! Cart settings commands.
//!
//! # Usage
//!
//! ```bash
//! ac-cli settings get
//! ac-cli settings set display-non-current-carts true
//! ```
//!
//! The storefront caches settings for up to a minute, so changes show up
//! there with that delay.

use clap::ValueEnum;
use thiserror::Error;

use advanced_cart_storefront::db::settings::{self as settings_db, SettingsError};

/// Errors that can occur while reading or writing settings.
#[derive(Debug, Error)]
pub enum SettingsCommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Settings that can be changed from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SettingKey {
    /// Show non-current carts below the current ones on the cart page
    DisplayNonCurrentCarts,
}

/// Print the cart settings.
///
/// # Errors
///
/// Returns an error if the settings cannot be loaded.
pub async fn get() -> Result<(), SettingsCommandError> {
    let pool = super::connect()
        .await
        .ok_or(SettingsCommandError::MissingEnvVar(super::DATABASE_URL_VAR))??;

    let settings = settings_db::get_cart_settings(&pool).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    }
    Ok(())
}

/// Change one cart setting.
///
/// # Errors
///
/// Returns an error if the settings cannot be loaded or stored.
pub async fn set(key: SettingKey, value: bool) -> Result<(), SettingsCommandError> {
    let pool = super::connect()
        .await
        .ok_or(SettingsCommandError::MissingEnvVar(super::DATABASE_URL_VAR))??;

    let mut settings = settings_db::get_cart_settings(&pool).await?;
    match key {
        SettingKey::DisplayNonCurrentCarts => settings.display_non_current_carts = value,
    }
    settings_db::set_cart_settings(&pool, &settings).await?;

    tracing::info!(?key, value, "Cart setting updated");
    Ok(())
}
