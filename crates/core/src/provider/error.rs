//! Errors raised by the cart provider.

use thiserror::Error;

use crate::types::{CustomerId, OrderType, StoreId};

/// Boxed collaborator error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Cart provider errors.
///
/// Finding no cart is not an error; lookups return `Option`.
#[derive(Debug, Error)]
pub enum CartError {
    /// A current cart already exists for the order type, store and account.
    #[error(
        "a current cart order for type \"{order_type}\", store \"{store_id}\" and account \"{customer_id}\" already exists"
    )]
    DuplicateCurrentCart {
        order_type: OrderType,
        store_id: StoreId,
        customer_id: CustomerId,
    },

    /// The cart store failed.
    #[error("cart store error: {0}")]
    Store(#[source] BoxError),

    /// The cart session failed.
    #[error("cart session error: {0}")]
    Session(#[source] BoxError),
}

impl CartError {
    pub(crate) fn store(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Store(Box::new(err))
    }

    pub(crate) fn session(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Session(Box::new(err))
    }
}
