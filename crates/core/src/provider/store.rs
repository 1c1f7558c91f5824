//! Cart persistence contract.

use std::future::Future;

use crate::types::{Cart, CartId, CustomerId, NewCart, OrderState};

/// Ordering of query results by cart id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Equality filters over cart orders.
///
/// `None` leaves a column unfiltered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartQuery {
    pub state: Option<OrderState>,
    pub is_cart: Option<bool>,
    pub locked: Option<bool>,
    pub customer_id: Option<CustomerId>,
    pub non_current: Option<bool>,
    pub order: SortOrder,
}

impl CartQuery {
    /// Every draft, unlocked cart of the customer, newest first.
    #[must_use]
    pub fn eligible_carts(customer_id: CustomerId) -> Self {
        Self {
            state: Some(OrderState::Draft),
            is_cart: Some(true),
            locked: Some(false),
            customer_id: Some(customer_id),
            non_current: None,
            order: SortOrder::Descending,
        }
    }

    /// Eligible carts that have not been marked non-current, newest first.
    #[must_use]
    pub fn current_carts(customer_id: CustomerId) -> Self {
        Self {
            non_current: Some(false),
            ..Self::eligible_carts(customer_id)
        }
    }

    /// Whether a cart passes every filter of the query.
    #[must_use]
    pub fn matches(&self, cart: &Cart) -> bool {
        self.state.is_none_or(|state| cart.state == state)
            && self.is_cart.is_none_or(|is_cart| cart.is_cart == is_cart)
            && self.locked.is_none_or(|locked| cart.locked == locked)
            && self
                .customer_id
                .is_none_or(|customer_id| cart.customer_id == customer_id)
            && self
                .non_current
                .is_none_or(|non_current| cart.non_current == non_current)
    }
}

/// Storage of cart orders.
///
/// Cart orders are owned by the order system; the resolver reads them, creates
/// new drafts, and saves flag changes.
pub trait CartStore: Send + Sync {
    /// Error raised by the storage backend.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist a new draft cart and return it with its assigned id.
    fn create(&self, cart: NewCart) -> impl Future<Output = Result<Cart, Self::Error>> + Send;

    /// Persist the mutable fields of an existing cart.
    fn save(&self, cart: &Cart) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Load one cart.
    fn load(&self, id: CartId) -> impl Future<Output = Result<Option<Cart>, Self::Error>> + Send;

    /// Load several carts. Missing ids are left out; the result follows the
    /// order of `ids`.
    fn load_multiple(
        &self,
        ids: &[CartId],
    ) -> impl Future<Output = Result<Vec<Cart>, Self::Error>> + Send;

    /// Find the carts matching the query.
    fn query(
        &self,
        query: &CartQuery,
    ) -> impl Future<Output = Result<Vec<Cart>, Self::Error>> + Send;
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::types::{OrderType, StoreId};

    fn cart(non_current: bool, locked: bool) -> Cart {
        let now = Utc::now();
        Cart {
            id: CartId::new(1),
            customer_id: CustomerId::new(42),
            store_id: StoreId::new(1),
            order_type: OrderType::default(),
            state: OrderState::Draft,
            is_cart: true,
            locked,
            non_current,
            item_count: 0,
            created_at: now,
            changed_at: now,
        }
    }

    #[test]
    fn test_current_carts_query_excludes_archived() {
        let query = CartQuery::current_carts(CustomerId::new(42));
        assert!(query.matches(&cart(false, false)));
        assert!(!query.matches(&cart(true, false)));
        assert!(!query.matches(&cart(false, true)));
    }

    #[test]
    fn test_eligible_carts_query_keeps_archived() {
        let query = CartQuery::eligible_carts(CustomerId::new(42));
        assert!(query.matches(&cart(true, false)));
        assert!(!query.matches(&cart(true, true)));
        assert!(!CartQuery::eligible_carts(CustomerId::new(7)).matches(&cart(false, false)));
    }

    #[test]
    fn test_default_query_matches_everything() {
        assert!(CartQuery::default().matches(&cart(true, true)));
        assert_eq!(CartQuery::default().order, SortOrder::Descending);
    }
}
