//! CLI subcommands.
//!
//! Every command reads `STOREFRONT_DATABASE_URL` (or `DATABASE_URL`).

pub mod carts;
pub mod migrate;
pub mod settings;

use secrecy::SecretString;
use sqlx::PgPool;

use advanced_cart_storefront::db;

/// Environment variable holding the storefront database URL.
const DATABASE_URL_VAR: &str = "STOREFRONT_DATABASE_URL";

/// Connect to the storefront database.
///
/// Returns `None` when no database URL is configured.
async fn connect() -> Option<Result<PgPool, sqlx::Error>> {
    dotenvy::dotenv().ok();

    let url = std::env::var(DATABASE_URL_VAR)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()?;

    tracing::info!("Connecting to storefront database...");
    Some(db::create_pool(&SecretString::from(url)).await)
}
