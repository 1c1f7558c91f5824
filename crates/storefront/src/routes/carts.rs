//! Cart route handlers.
//!
//! Every request builds its own resolver, so indices never outlive the
//! request that built them.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use advanced_cart_core::provider::CartStore;
use advanced_cart_core::{Account, Cart, CartError, CartId, OrderType, StoreId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::CurrentAccount;
use crate::services::{CartAccess, archive_cart, check_access, restore_cart, split_carts};
use crate::state::{AppState, CartResolver};
use crate::views::{CacheMetadata, CartFormView, CartListing};

/// Cart listing template.
#[derive(Template, WebTemplate)]
#[template(path = "carts/index.html")]
pub struct CartIndexTemplate {
    pub listing: CartListing,
}

/// Empty cart template.
#[derive(Template, WebTemplate)]
#[template(path = "carts/empty.html")]
pub struct EmptyCartTemplate;

/// Single cart template.
#[derive(Template, WebTemplate)]
#[template(path = "carts/show.html")]
pub struct CartShowTemplate {
    pub cart: CartFormView,
}

/// Create cart form data.
#[derive(Debug, Deserialize)]
pub struct CreateCartForm {
    pub order_type: Option<String>,
    pub store_id: Option<i32>,
}

/// Display the cart listing.
///
/// Only carts with items are listed. Saved carts are shown below the current
/// ones when the `display_non_current_carts` setting is on.
#[instrument(skip(state, current), fields(customer_id = %current.account.id()))]
pub async fn index(State(state): State<AppState>, current: CurrentAccount) -> Result<Response> {
    let mut resolver = state.resolver(current.session);

    let carts: Vec<Cart> = resolver
        .carts(&current.account)
        .await?
        .into_iter()
        .filter(Cart::has_items)
        .collect();

    if carts.is_empty() {
        return Ok((CacheMetadata::empty(), EmptyCartTemplate).into_response());
    }

    let (current_carts, non_current_carts) = split_carts(&mut resolver, carts).await?;
    let settings = state.settings().cart_settings().await?;

    let metadata = CacheMetadata::for_listing(
        &current_carts,
        &non_current_carts,
        settings.display_non_current_carts,
    );
    let mut listing = CartListing::build(
        &current_carts,
        &non_current_carts,
        settings.display_non_current_carts,
        &state.config().carts,
    );
    if !can_manage(&current.account) {
        listing = listing.read_only();
    }

    Ok((metadata, CartIndexTemplate { listing }).into_response())
}

/// Create a cart.
///
/// If the account already has a current cart for the order type and store,
/// redirects to that cart instead.
#[instrument(skip(state, current), fields(customer_id = %current.account.id()))]
pub async fn create(
    State(state): State<AppState>,
    current: CurrentAccount,
    Form(form): Form<CreateCartForm>,
) -> Result<Redirect> {
    let defaults = &state.config().carts;
    let order_type = form
        .order_type
        .filter(|t| !t.trim().is_empty())
        .map_or_else(|| defaults.default_order_type.clone(), OrderType::new);
    let store_id = form
        .store_id
        .map_or(defaults.default_store_id, StoreId::new);

    let mut resolver = state.resolver(current.session);
    match resolver
        .create_cart(order_type.clone(), store_id, &current.account)
        .await
    {
        Ok(cart) => {
            let id = cart.id.to_string();
            add_breadcrumb("cart", "Created cart", Some(&[("cart_id", id.as_str())]));
            Ok(Redirect::to(&format!("/cart/{}", cart.id)))
        }
        Err(CartError::DuplicateCurrentCart { .. }) => {
            let existing = resolver
                .current_cart_id(&order_type, store_id, &current.account)
                .await?;
            let location = existing.map_or_else(|| "/cart".to_string(), |id| format!("/cart/{id}"));
            Ok(Redirect::to(&location))
        }
        Err(e) => Err(e.into()),
    }
}

/// Display a single cart.
#[instrument(skip(state, current), fields(customer_id = %current.account.id()))]
pub async fn show(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(cart_id): Path<i32>,
) -> Result<Response> {
    let mut resolver = state.resolver(current.session.clone());
    let cart = load_accessible_cart(&resolver, &current, CartId::new(cart_id)).await?;

    let config = &state.config().carts;
    let mut view = if resolver.is_current(&cart).await? {
        CartFormView::current(&cart, &config.current_views)
    } else {
        CartFormView::non_current(&cart, &config.non_current_views)
    };
    if !can_manage(&current.account) {
        view = view.read_only();
    }

    Ok((
        CacheMetadata::for_carts([&cart]),
        CartShowTemplate { cart: view },
    )
        .into_response())
}

/// Save a cart for later.
#[instrument(skip(state, current), fields(customer_id = %current.account.id()))]
pub async fn archive(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(cart_id): Path<i32>,
) -> Result<Redirect> {
    ensure_can_manage(&current.account)?;
    let mut resolver = state.resolver(current.session.clone());
    let cart = load_accessible_cart(&resolver, &current, CartId::new(cart_id)).await?;

    let cart = archive_cart(&mut resolver, cart).await?;
    let id = cart.id.to_string();
    add_breadcrumb("cart", "Archived cart", Some(&[("cart_id", id.as_str())]));

    Ok(Redirect::to("/cart"))
}

/// Make a saved cart current again.
#[instrument(skip(state, current), fields(customer_id = %current.account.id()))]
pub async fn restore(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(cart_id): Path<i32>,
) -> Result<Redirect> {
    ensure_can_manage(&current.account)?;
    let mut resolver = state.resolver(current.session.clone());
    let cart = load_accessible_cart(&resolver, &current, CartId::new(cart_id)).await?;

    let cart = restore_cart(&mut resolver, cart).await?;
    let id = cart.id.to_string();
    add_breadcrumb("cart", "Restored cart", Some(&[("cart_id", id.as_str())]));

    Ok(Redirect::to("/cart"))
}

/// Whether the account may archive and restore carts.
///
/// Guest carts are found through the session, which ignores the non-current
/// flag, so archiving one would have no effect.
fn can_manage(account: &Account) -> bool {
    account.is_authenticated()
}

fn ensure_can_manage(account: &Account) -> Result<()> {
    if can_manage(account) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "guest carts cannot be archived or restored".to_string(),
        ))
    }
}

/// Load a cart and check the account may use it.
async fn load_accessible_cart(
    resolver: &CartResolver,
    current: &CurrentAccount,
    cart_id: CartId,
) -> Result<Cart> {
    let cart = resolver
        .store()
        .load(cart_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("cart {cart_id}")))?;

    let access = check_access(&cart, &current.account, resolver.session())
        .await
        .map_err(AppError::Session)?;

    match access {
        CartAccess::Allowed => Ok(cart),
        denied => {
            tracing::debug!(cart_id = %cart.id, ?denied, "Cart access denied");
            Err(AppError::Forbidden(format!("cart {cart_id}")))
        }
    }
}
