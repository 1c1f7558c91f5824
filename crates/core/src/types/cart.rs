//! Cart domain types.
//!
//! A cart is a draft order flagged as a shopping cart. The order itself is owned
//! by the order system; these types are the projection the cart rules read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{CartId, CustomerId, StoreId};
use super::order_type::OrderType;
use super::status::OrderState;

/// A cart order (domain type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Order ID of the cart.
    pub id: CartId,
    /// Owner. [`CustomerId::ANONYMOUS`] for guest carts.
    pub customer_id: CustomerId,
    /// Store the cart is bought from.
    pub store_id: StoreId,
    /// Order type (bundle) of the cart.
    pub order_type: OrderType,
    /// Lifecycle state; only drafts can be carts.
    pub state: OrderState,
    /// Whether the order is a shopping cart rather than a placed order.
    pub is_cart: bool,
    /// Set while the customer is mid-checkout, e.g. off-site for payment.
    pub locked: bool,
    /// Set when the cart has been parked (archived) by the customer or system.
    pub non_current: bool,
    /// Number of line items on the cart.
    pub item_count: u32,
    /// When the cart was created.
    pub created_at: DateTime<Utc>,
    /// When the cart was last changed.
    pub changed_at: DateTime<Utc>,
}

impl Cart {
    /// Whether the order can be handed out as a cart at all: a draft, flagged
    /// as cart, and not locked.
    #[must_use]
    pub const fn is_eligible(&self) -> bool {
        matches!(self.state, OrderState::Draft) && self.is_cart && !self.locked
    }

    #[must_use]
    pub const fn has_items(&self) -> bool {
        self.item_count > 0
    }

    /// The `(order type, store)` combination this cart is filed under.
    #[must_use]
    pub fn key(&self) -> CartKey {
        CartKey {
            order_type: self.order_type.clone(),
            store_id: self.store_id,
        }
    }

    /// Cache tag invalidated whenever this cart changes.
    #[must_use]
    pub fn cache_tag(&self) -> String {
        format!("commerce_order:{}", self.id)
    }
}

/// The `(order type, store)` pair a customer has at most one current cart for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartKey {
    pub order_type: OrderType,
    pub store_id: StoreId,
}

impl CartKey {
    #[must_use]
    pub const fn new(order_type: OrderType, store_id: StoreId) -> Self {
        Self {
            order_type,
            store_id,
        }
    }

    /// Whether this key is for the given order type and store.
    #[must_use]
    pub fn matches(&self, order_type: &OrderType, store_id: StoreId) -> bool {
        self.store_id == store_id && &self.order_type == order_type
    }
}

/// An unsaved cart.
///
/// New carts are always current, unlocked drafts flagged as cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCart {
    pub order_type: OrderType,
    pub store_id: StoreId,
    pub customer_id: CustomerId,
}

impl NewCart {
    #[must_use]
    pub const fn new(order_type: OrderType, store_id: StoreId, customer_id: CustomerId) -> Self {
        Self {
            order_type,
            store_id,
            customer_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart() -> Cart {
        let now = Utc::now();
        Cart {
            id: CartId::new(101),
            customer_id: CustomerId::new(42),
            store_id: StoreId::new(1),
            order_type: OrderType::default(),
            state: OrderState::Draft,
            is_cart: true,
            locked: false,
            non_current: false,
            item_count: 2,
            created_at: now,
            changed_at: now,
        }
    }

    #[test]
    fn test_draft_unlocked_cart_is_eligible() {
        assert!(cart().is_eligible());
    }

    #[test]
    fn test_locked_cart_is_not_eligible() {
        let cart = Cart {
            locked: true,
            ..cart()
        };
        assert!(!cart.is_eligible());
    }

    #[test]
    fn test_placed_order_is_not_eligible() {
        let placed = Cart {
            state: OrderState::Completed,
            ..cart()
        };
        assert!(!placed.is_eligible());

        let not_cart = Cart {
            is_cart: false,
            ..cart()
        };
        assert!(!not_cart.is_eligible());
    }

    #[test]
    fn test_non_current_flag_does_not_affect_eligibility() {
        let archived = Cart {
            non_current: true,
            ..cart()
        };
        assert!(archived.is_eligible());
    }

    #[test]
    fn test_key_and_cache_tag() {
        let cart = cart();
        assert!(cart.key().matches(&OrderType::new("default"), StoreId::new(1)));
        assert!(!cart.key().matches(&OrderType::new("b2b"), StoreId::new(1)));
        assert!(!cart.key().matches(&OrderType::new("default"), StoreId::new(2)));
        assert_eq!(cart.cache_tag(), "commerce_order:101");
    }
}
