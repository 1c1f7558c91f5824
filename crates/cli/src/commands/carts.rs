//! Cart management commands.
//!
//! # Usage
//!
//! ```bash
//! ac-cli carts archive 101
//! ac-cli carts restore 101
//! ```
//!
//! Guest carts are matched by id only; there is no visitor session here, so
//! restoring a guest cart archives nothing else.

use thiserror::Error;

use advanced_cart_core::provider::CartStore;
use advanced_cart_core::provider::memory::InMemoryCartSession;
use advanced_cart_core::{Cart, CartError, CartId, CurrentCartResolver};
use advanced_cart_storefront::db::{PgCartStore, RepositoryError};
use advanced_cart_storefront::services::{archive_cart, restore_cart};

/// Errors that can occur while changing carts.
#[derive(Debug, Error)]
pub enum CartsCommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("Cart not found: {0}")]
    NotFound(CartId),

    #[error("Order {0} is not an open cart")]
    NotCart(CartId),
}

type Resolver = CurrentCartResolver<PgCartStore, InMemoryCartSession>;

async fn load(cart_id: i32) -> Result<(Resolver, Cart), CartsCommandError> {
    let pool = super::connect()
        .await
        .ok_or(CartsCommandError::MissingEnvVar(super::DATABASE_URL_VAR))??;
    let resolver = CurrentCartResolver::new(PgCartStore::new(pool), InMemoryCartSession::new());

    let cart_id = CartId::new(cart_id);
    let cart = resolver
        .store()
        .load(cart_id)
        .await?
        .ok_or(CartsCommandError::NotFound(cart_id))?;

    if !cart.is_eligible() {
        return Err(CartsCommandError::NotCart(cart_id));
    }
    Ok((resolver, cart))
}

/// Mark a cart non-current.
///
/// # Errors
///
/// Returns an error if the cart does not exist, is not an open cart, or
/// cannot be saved.
pub async fn archive(cart_id: i32) -> Result<(), CartsCommandError> {
    let (mut resolver, cart) = load(cart_id).await?;
    let cart = archive_cart(&mut resolver, cart).await?;

    tracing::info!(cart_id = %cart.id, customer_id = %cart.customer_id, "Cart archived");
    Ok(())
}

/// Make a cart current again.
///
/// # Errors
///
/// Returns an error if the cart does not exist, is not an open cart, or
/// cannot be saved.
pub async fn restore(cart_id: i32) -> Result<(), CartsCommandError> {
    let (mut resolver, cart) = load(cart_id).await?;
    let cart = restore_cart(&mut resolver, cart).await?;

    tracing::info!(cart_id = %cart.id, customer_id = %cart.customer_id, "Cart restored");
    Ok(())
}
