//! Session-related types.
//!
//! Types stored in the session for identity and anonymous carts.

use serde::{Deserialize, Serialize};

use advanced_cart_core::{Account, CustomerId};

/// Session-stored customer identity.
///
/// Written by whichever login flow fronts the storefront; absent for guests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Customer's database ID.
    pub id: CustomerId,
}

impl From<CurrentUser> for Account {
    fn from(user: CurrentUser) -> Self {
        Self::authenticated(user.id)
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in customer.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the ids of carts created by an anonymous visitor.
    pub const CART_IDS: &str = "cart_ids";
}
