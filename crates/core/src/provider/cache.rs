//! Per-resolver cart indices.
//!
//! Building an index costs a query (or, for guests, loading every cart in the
//! session), so each resolver keeps the indices it has built until
//! [`CartCache::invalidate`] is called. Nothing here outlives the resolver.

use std::collections::HashMap;

use crate::types::{Cart, CartId, CartKey, CustomerId, OrderType, StoreId};

/// Cart ids of one customer with the `(order type, store)` each is filed under.
///
/// Entries keep the order the store returned them in (newest first); carts
/// created through the resolver are put in front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartIndex {
    entries: Vec<(CartId, CartKey)>,
}

impl CartIndex {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a cart, replacing the entry already indexed under the same id.
    pub fn insert(&mut self, id: CartId, key: CartKey) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => entry.1 = key,
            None => self.entries.push((id, key)),
        }
    }

    /// Add a cart ahead of every indexed one, replacing the entry already
    /// indexed under the same id.
    pub fn insert_newest(&mut self, id: CartId, key: CartKey) {
        self.entries.retain(|(existing, _)| *existing != id);
        self.entries.insert(0, (id, key));
    }

    /// The cart filed under the order type and store.
    ///
    /// Several carts may match when carts were created concurrently or flags
    /// were changed outside the resolver; the highest (newest) id wins.
    #[must_use]
    pub fn find(&self, order_type: &OrderType, store_id: StoreId) -> Option<CartId> {
        self.entries
            .iter()
            .filter(|(_, key)| key.matches(order_type, store_id))
            .map(|(id, _)| *id)
            .max()
    }

    #[must_use]
    pub fn contains(&self, id: CartId) -> bool {
        self.entries.iter().any(|(existing, _)| *existing == id)
    }

    /// Indexed cart ids, in index order.
    pub fn ids(&self) -> impl Iterator<Item = CartId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<&'a Cart> for CartIndex {
    fn from_iter<I: IntoIterator<Item = &'a Cart>>(iter: I) -> Self {
        let mut index = Self::new();
        for cart in iter {
            index.insert(cart.id, cart.key());
        }
        index
    }
}

/// The indices a resolver has built, per customer.
///
/// - `all` - every eligible cart, current or not
/// - `current` - eligible carts not marked non-current
#[derive(Debug, Clone, Default)]
pub struct CartCache {
    all: HashMap<CustomerId, CartIndex>,
    current: HashMap<CustomerId, CartIndex>,
}

impl CartCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn all(&self, customer_id: CustomerId) -> Option<&CartIndex> {
        self.all.get(&customer_id)
    }

    #[must_use]
    pub fn current(&self, customer_id: CustomerId) -> Option<&CartIndex> {
        self.current.get(&customer_id)
    }

    pub fn set_all(&mut self, customer_id: CustomerId, index: CartIndex) {
        self.all.insert(customer_id, index);
    }

    pub fn set_current(&mut self, customer_id: CustomerId, index: CartIndex) {
        self.current.insert(customer_id, index);
    }

    /// Record a freshly created cart in the indices already built for its
    /// owner. Indices that were never built stay unbuilt.
    pub fn record_new_cart(&mut self, cart: &Cart) {
        if let Some(index) = self.all.get_mut(&cart.customer_id) {
            index.insert_newest(cart.id, cart.key());
        }
        if let Some(index) = self.current.get_mut(&cart.customer_id) {
            index.insert_newest(cart.id, cart.key());
        }
    }

    /// Drop every index.
    pub fn invalidate(&mut self) {
        self.all.clear();
        self.current.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(order_type: &str, store_id: i32) -> CartKey {
        CartKey::new(OrderType::new(order_type), StoreId::new(store_id))
    }

    #[test]
    fn test_find_returns_highest_matching_id() {
        let mut index = CartIndex::new();
        // Inserted newest first, the way the store query returns them.
        index.insert(CartId::new(103), key("default", 1));
        index.insert(CartId::new(102), key("b2b", 1));
        index.insert(CartId::new(101), key("default", 1));

        assert_eq!(
            index.find(&OrderType::new("default"), StoreId::new(1)),
            Some(CartId::new(103))
        );
        assert_eq!(
            index.find(&OrderType::new("b2b"), StoreId::new(1)),
            Some(CartId::new(102))
        );
        assert_eq!(index.find(&OrderType::new("default"), StoreId::new(2)), None);
    }

    #[test]
    fn test_insert_replaces_existing_entry() {
        let mut index = CartIndex::new();
        index.insert(CartId::new(5), key("default", 1));
        index.insert(CartId::new(5), key("default", 2));

        assert_eq!(index.len(), 1);
        assert_eq!(
            index.find(&OrderType::new("default"), StoreId::new(2)),
            Some(CartId::new(5))
        );
    }

    #[test]
    fn test_insert_newest_goes_first() {
        let mut index = CartIndex::new();
        index.insert(CartId::new(2), key("default", 1));
        index.insert(CartId::new(1), key("default", 1));
        index.insert_newest(CartId::new(3), key("default", 1));
        index.insert_newest(CartId::new(1), key("b2b", 1));

        assert_eq!(
            index.ids().collect::<Vec<_>>(),
            vec![CartId::new(1), CartId::new(3), CartId::new(2)]
        );
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_record_new_cart_only_touches_built_indices() {
        let customer = CustomerId::new(42);
        let mut cache = CartCache::new();
        cache.set_current(customer, CartIndex::new());

        let now = chrono::Utc::now();
        let cart = Cart {
            id: CartId::new(9),
            customer_id: customer,
            store_id: StoreId::new(1),
            order_type: OrderType::default(),
            state: crate::types::OrderState::Draft,
            is_cart: true,
            locked: false,
            non_current: false,
            item_count: 0,
            created_at: now,
            changed_at: now,
        };
        cache.record_new_cart(&cart);

        assert!(cache.current(customer).is_some_and(|i| i.contains(cart.id)));
        assert!(cache.all(customer).is_none());
    }

    #[test]
    fn test_invalidate_drops_everything() {
        let customer = CustomerId::new(42);
        let mut cache = CartCache::new();
        cache.set_all(customer, CartIndex::new());
        cache.set_current(customer, CartIndex::new());

        cache.invalidate();

        assert!(cache.all(customer).is_none());
        assert!(cache.current(customer).is_none());
    }
}
