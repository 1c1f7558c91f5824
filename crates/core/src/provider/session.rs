//! Anonymous cart session contract.

use std::future::Future;

use crate::types::CartId;

/// The cart ids held by the anonymous visitor's session.
///
/// Guests have no customer id to query by, so their carts are found through
/// the ids remembered in their session.
pub trait CartSession: Send + Sync {
    /// Error raised by the session backend.
    type Error: std::error::Error + Send + Sync + 'static;

    /// All cart ids in the session, in the order they were added.
    fn cart_ids(&self) -> impl Future<Output = Result<Vec<CartId>, Self::Error>> + Send;

    /// Remember a cart id. Adding an id twice keeps one entry.
    fn add_cart_id(&self, cart_id: CartId) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Forget a cart id. Unknown ids are ignored.
    fn delete_cart_id(
        &self,
        cart_id: CartId,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Whether the session holds the cart id.
    fn has_cart_id(&self, cart_id: CartId)
    -> impl Future<Output = Result<bool, Self::Error>> + Send;
}
