//! View models for the cart pages.
//!
//! Turns resolved carts into what the templates render, and carries the cache
//! metadata each page sends along.

use axum::http::header::{CACHE_CONTROL, VARY};
use axum::http::{HeaderName, HeaderValue};
use axum::response::{IntoResponseParts, ResponseParts};

use advanced_cart_core::{Cart, CartId, OrderType, StoreId};

use crate::config::{CartConfig, CartViews};

/// CSS class of a current cart's form.
pub const CURRENT_CART_CLASS: &str = "cart--current-form";

/// CSS class of a non-current cart's form.
pub const NON_CURRENT_CART_CLASS: &str = "cart--non-current-form";

/// Header listing the cache tags of a response, for tag-based purging.
pub static CACHE_TAG: HeaderName = HeaderName::from_static("cache-tag");

/// One cart rendered with its form view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartFormView {
    pub id: CartId,
    pub order_type: OrderType,
    pub store_id: StoreId,
    pub item_count: u32,
    /// Name of the view that renders the cart form.
    pub view: String,
    pub css_class: &'static str,
    pub is_current: bool,
    /// Whether the archive and restore forms are offered.
    pub can_manage: bool,
}

impl CartFormView {
    /// View a current cart.
    #[must_use]
    pub fn current(cart: &Cart, views: &CartViews) -> Self {
        Self::build(cart, views, CURRENT_CART_CLASS, true)
    }

    /// View a non-current cart.
    #[must_use]
    pub fn non_current(cart: &Cart, views: &CartViews) -> Self {
        Self::build(cart, views, NON_CURRENT_CART_CLASS, false)
    }

    fn build(cart: &Cart, views: &CartViews, css_class: &'static str, is_current: bool) -> Self {
        Self {
            id: cart.id,
            order_type: cart.order_type.clone(),
            store_id: cart.store_id,
            item_count: cart.item_count,
            view: views.view_for(&cart.order_type).to_string(),
            css_class,
            is_current,
            can_manage: true,
        }
    }

    /// Drop the archive and restore forms.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.can_manage = false;
        self
    }
}

/// The cart listing page: current carts first, then the non-current ones if
/// they are shown at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartListing {
    pub current: Vec<CartFormView>,
    pub non_current: Vec<CartFormView>,
}

impl CartListing {
    /// Build the listing from split carts.
    #[must_use]
    pub fn build(
        current: &[Cart],
        non_current: &[Cart],
        display_non_current: bool,
        config: &CartConfig,
    ) -> Self {
        let current = current
            .iter()
            .map(|cart| CartFormView::current(cart, &config.current_views))
            .collect();
        let non_current = if display_non_current {
            non_current
                .iter()
                .map(|cart| CartFormView::non_current(cart, &config.non_current_views))
                .collect()
        } else {
            Vec::new()
        };

        Self {
            current,
            non_current,
        }
    }

    /// Drop the archive and restore forms from every cart.
    ///
    /// Guest carts cannot be archived, so guests get the listing without them.
    #[must_use]
    pub fn read_only(self) -> Self {
        Self {
            current: self.current.into_iter().map(CartFormView::read_only).collect(),
            non_current: self
                .non_current
                .into_iter()
                .map(CartFormView::read_only)
                .collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty() && self.non_current.is_empty()
    }
}

/// Cache metadata of a cart page.
///
/// Cart pages vary by user and session, so they always vary on the cookie.
/// Every cart shown contributes its cache tag; a page without carts must not
/// be cached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheMetadata {
    tags: Vec<String>,
    uncacheable: bool,
}

impl CacheMetadata {
    /// Metadata of a page showing the given carts.
    pub fn for_carts<'a>(carts: impl IntoIterator<Item = &'a Cart>) -> Self {
        let mut metadata = Self::default();
        for cart in carts {
            metadata.add_tag(cart.cache_tag());
        }
        if metadata.tags.is_empty() {
            metadata.uncacheable = true;
        }
        metadata
    }

    /// Metadata of the cart listing: the current carts, plus the non-current
    /// ones only when they are displayed.
    #[must_use]
    pub fn for_listing(current: &[Cart], non_current: &[Cart], display_non_current: bool) -> Self {
        let shown: &[Cart] = if display_non_current { non_current } else { &[] };
        Self::for_carts(current.iter().chain(shown))
    }

    /// Metadata of the empty-cart page.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            tags: Vec::new(),
            uncacheable: true,
        }
    }

    pub fn add_tag(&mut self, tag: String) {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    #[must_use]
    pub const fn is_cacheable(&self) -> bool {
        !self.uncacheable
    }
}

impl IntoResponseParts for CacheMetadata {
    type Error = std::convert::Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        let headers = res.headers_mut();
        headers.append(VARY, HeaderValue::from_static("cookie"));

        if self.uncacheable {
            headers.insert(CACHE_CONTROL, HeaderValue::from_static("private, max-age=0"));
        } else {
            headers.insert(CACHE_CONTROL, HeaderValue::from_static("private"));
        }

        if !self.tags.is_empty()
            && let Ok(value) = HeaderValue::from_str(&self.tags.join(" "))
        {
            headers.insert(CACHE_TAG.clone(), value);
        }

        Ok(res)
    }
}
