//! Cart page operations shared by the routes and the CLI.
//!
//! Flag changes go through the resolver's store and clear its caches so the
//! next lookup in the same request sees them.

use tracing::{info, instrument};

use advanced_cart_core::provider::{CartSession, CartStore};
use advanced_cart_core::{Account, Cart, CartError, CurrentCartResolver, OrderState};

/// Outcome of an access check on a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAccess {
    Allowed,
    /// The cart belongs to another account or another guest session.
    NotOwner,
    /// The order is no longer a draft cart.
    NotCart,
    /// The cart is locked for checkout.
    Locked,
}

impl CartAccess {
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Check whether the account may view or change the cart.
///
/// Guests must also hold the cart id in their session, since every guest
/// shares the anonymous customer id.
///
/// # Errors
///
/// Returns the session error if the session cannot be read.
pub async fn check_access<C: CartSession>(
    cart: &Cart,
    account: &Account,
    session: &C,
) -> Result<CartAccess, C::Error> {
    if cart.customer_id != account.id() {
        return Ok(CartAccess::NotOwner);
    }
    if account.is_anonymous() && !session.has_cart_id(cart.id).await? {
        return Ok(CartAccess::NotOwner);
    }
    if cart.state != OrderState::Draft || !cart.is_cart {
        return Ok(CartAccess::NotCart);
    }
    if cart.locked {
        return Ok(CartAccess::Locked);
    }
    Ok(CartAccess::Allowed)
}

/// Split carts into the current ones and the rest, keeping their order.
///
/// # Errors
///
/// Returns `CartError` if the resolver cannot build its index.
pub async fn split_carts<S, C>(
    resolver: &mut CurrentCartResolver<S, C>,
    carts: Vec<Cart>,
) -> Result<(Vec<Cart>, Vec<Cart>), CartError>
where
    S: CartStore,
    C: CartSession,
{
    let mut current = Vec::new();
    let mut non_current = Vec::new();
    for cart in carts {
        if resolver.is_current(&cart).await? {
            current.push(cart);
        } else {
            non_current.push(cart);
        }
    }
    Ok((current, non_current))
}

/// Mark a cart non-current.
///
/// # Errors
///
/// Returns `CartError::Store` if the cart cannot be saved.
#[instrument(skip(resolver, cart), fields(cart_id = %cart.id))]
pub async fn archive_cart<S, C>(
    resolver: &mut CurrentCartResolver<S, C>,
    mut cart: Cart,
) -> Result<Cart, CartError>
where
    S: CartStore,
    C: CartSession,
{
    if !cart.non_current {
        cart.non_current = true;
        resolver
            .store()
            .save(&cart)
            .await
            .map_err(|e| CartError::Store(Box::new(e)))?;
        resolver.clear_caches();
        info!("Archived cart");
    }
    Ok(cart)
}

/// Make a cart current again, archiving the cart that was current for its
/// order type and store.
///
/// # Errors
///
/// Returns `CartError` if the current cart cannot be resolved or a cart
/// cannot be saved.
#[instrument(skip(resolver, cart), fields(cart_id = %cart.id))]
pub async fn restore_cart<S, C>(
    resolver: &mut CurrentCartResolver<S, C>,
    mut cart: Cart,
) -> Result<Cart, CartError>
where
    S: CartStore,
    C: CartSession,
{
    let owner = Account::authenticated(cart.customer_id);
    let previous = resolver
        .current_cart(&cart.order_type, cart.store_id, &owner)
        .await?;

    if let Some(previous) = previous.filter(|previous| previous.id != cart.id) {
        archive_cart(resolver, previous).await?;
    }

    if cart.non_current {
        cart.non_current = false;
        resolver
            .store()
            .save(&cart)
            .await
            .map_err(|e| CartError::Store(Box::new(e)))?;
        resolver.clear_caches();
        info!("Restored cart");
    }
    Ok(cart)
}
