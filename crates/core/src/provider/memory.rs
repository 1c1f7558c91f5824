//! In-memory cart store and session.
//!
//! Used by tests and local tooling. Both types are cheap to clone and clones
//! share state, so a test can keep a handle while the resolver owns another.

use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use super::session::CartSession;
use super::store::{CartQuery, CartStore, SortOrder};
use crate::types::{Cart, CartId, CustomerId, NewCart, OrderState, OrderType, StoreId};

/// Cart store backed by a `Vec`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartStore {
    inner: Arc<StoreInner>,
}

#[derive(Debug, Default)]
struct StoreInner {
    carts: Mutex<Vec<Cart>>,
    next_id: AtomicUsize,
    queries: AtomicUsize,
}

impl InMemoryCartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose first cart gets `first_id`.
    #[must_use]
    pub fn starting_at(first_id: i32) -> Self {
        let store = Self::default();
        let next = usize::try_from(first_id.saturating_sub(1)).unwrap_or_default();
        store.inner.next_id.store(next, Ordering::SeqCst);
        store
    }

    /// Start seeding a cart. The cart is stored when [`CartSeed::build`] runs.
    #[must_use]
    pub fn insert_cart(&self, customer_id: i32, store_id: i32, order_type: &str) -> CartSeed<'_> {
        let now = Utc::now();
        CartSeed {
            store: self,
            cart: Cart {
                id: self.next_id(),
                customer_id: CustomerId::new(customer_id),
                store_id: StoreId::new(store_id),
                order_type: OrderType::new(order_type),
                state: OrderState::Draft,
                is_cart: true,
                locked: false,
                non_current: false,
                item_count: 0,
                created_at: now,
                changed_at: now,
            },
        }
    }

    /// Number of [`CartStore::query`] calls served so far.
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.inner.queries.load(Ordering::SeqCst)
    }

    /// Number of stored carts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.carts().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.carts().is_empty()
    }

    fn carts(&self) -> MutexGuard<'_, Vec<Cart>> {
        self.inner
            .carts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn next_id(&self) -> CartId {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        CartId::new(i32::try_from(id).unwrap_or(i32::MAX))
    }
}

impl CartStore for InMemoryCartStore {
    type Error = Infallible;

    async fn create(&self, cart: NewCart) -> Result<Cart, Self::Error> {
        let now = Utc::now();
        let cart = Cart {
            id: self.next_id(),
            customer_id: cart.customer_id,
            store_id: cart.store_id,
            order_type: cart.order_type,
            state: OrderState::Draft,
            is_cart: true,
            locked: false,
            non_current: false,
            item_count: 0,
            created_at: now,
            changed_at: now,
        };
        self.carts().push(cart.clone());
        Ok(cart)
    }

    async fn save(&self, cart: &Cart) -> Result<(), Self::Error> {
        let mut carts = self.carts();
        match carts.iter_mut().find(|existing| existing.id == cart.id) {
            Some(existing) => {
                *existing = Cart {
                    changed_at: Utc::now(),
                    ..cart.clone()
                };
            }
            None => carts.push(cart.clone()),
        }
        Ok(())
    }

    async fn load(&self, id: CartId) -> Result<Option<Cart>, Self::Error> {
        Ok(self.carts().iter().find(|cart| cart.id == id).cloned())
    }

    async fn load_multiple(&self, ids: &[CartId]) -> Result<Vec<Cart>, Self::Error> {
        let carts = self.carts();
        Ok(ids
            .iter()
            .filter_map(|id| carts.iter().find(|cart| cart.id == *id).cloned())
            .collect())
    }

    async fn query(&self, query: &CartQuery) -> Result<Vec<Cart>, Self::Error> {
        self.inner.queries.fetch_add(1, Ordering::SeqCst);

        let mut matches: Vec<Cart> = self
            .carts()
            .iter()
            .filter(|cart| query.matches(cart))
            .cloned()
            .collect();
        match query.order {
            SortOrder::Ascending => matches.sort_by_key(|cart| cart.id),
            SortOrder::Descending => matches.sort_by_key(|cart| std::cmp::Reverse(cart.id)),
        }
        Ok(matches)
    }
}

/// Builder returned by [`InMemoryCartStore::insert_cart`].
#[derive(Debug)]
#[must_use = "the cart is only stored by `build`"]
pub struct CartSeed<'a> {
    store: &'a InMemoryCartStore,
    cart: Cart,
}

impl CartSeed<'_> {
    pub fn non_current(mut self) -> Self {
        self.cart.non_current = true;
        self
    }

    pub fn locked(mut self) -> Self {
        self.cart.locked = true;
        self
    }

    pub fn not_cart(mut self) -> Self {
        self.cart.is_cart = false;
        self
    }

    pub fn state(mut self, state: OrderState) -> Self {
        self.cart.state = state;
        self
    }

    pub fn items(mut self, count: u32) -> Self {
        self.cart.item_count = count;
        self
    }

    /// Store the cart and return it.
    pub fn build(self) -> Cart {
        self.store.carts().push(self.cart.clone());
        self.cart
    }
}

/// Anonymous cart session backed by a `Vec`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartSession {
    cart_ids: Arc<Mutex<Vec<CartId>>>,
}

impl InMemoryCartSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_cart_ids(ids: impl IntoIterator<Item = CartId>) -> Self {
        Self {
            cart_ids: Arc::new(Mutex::new(ids.into_iter().collect())),
        }
    }

    fn ids(&self) -> MutexGuard<'_, Vec<CartId>> {
        self.cart_ids.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CartSession for InMemoryCartSession {
    type Error = Infallible;

    async fn cart_ids(&self) -> Result<Vec<CartId>, Self::Error> {
        Ok(self.ids().clone())
    }

    async fn add_cart_id(&self, cart_id: CartId) -> Result<(), Self::Error> {
        let mut ids = self.ids();
        if !ids.contains(&cart_id) {
            ids.push(cart_id);
        }
        Ok(())
    }

    async fn delete_cart_id(&self, cart_id: CartId) -> Result<(), Self::Error> {
        self.ids().retain(|id| *id != cart_id);
        Ok(())
    }

    async fn has_cart_id(&self, cart_id: CartId) -> Result<bool, Self::Error> {
        Ok(self.ids().contains(&cart_id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_assigns_increasing_ids() {
        let store = InMemoryCartStore::new();
        let seeded = store.insert_cart(42, 1, "default").build();
        let created = store
            .create(NewCart::new(
                OrderType::default(),
                StoreId::new(1),
                CustomerId::new(42),
            ))
            .await
            .unwrap();

        assert!(created.id > seeded.id);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_starting_at_sets_first_id() {
        let store = InMemoryCartStore::starting_at(101);
        assert_eq!(store.insert_cart(42, 1, "default").build().id, CartId::new(101));
        assert_eq!(store.insert_cart(42, 1, "default").build().id, CartId::new(102));
    }

    #[tokio::test]
    async fn test_load_multiple_follows_requested_order_and_skips_missing() {
        let store = InMemoryCartStore::new();
        let a = store.insert_cart(42, 1, "default").build();
        let b = store.insert_cart(42, 1, "default").build();

        let carts = store
            .load_multiple(&[b.id, CartId::new(999), a.id])
            .await
            .unwrap();

        assert_eq!(carts, vec![b, a]);
    }

    #[tokio::test]
    async fn test_session_add_is_idempotent() {
        let session = InMemoryCartSession::new();
        session.add_cart_id(CartId::new(5)).await.unwrap();
        session.add_cart_id(CartId::new(5)).await.unwrap();
        session.add_cart_id(CartId::new(7)).await.unwrap();

        assert_eq!(
            session.cart_ids().await.unwrap(),
            vec![CartId::new(5), CartId::new(7)]
        );

        session.delete_cart_id(CartId::new(5)).await.unwrap();
        assert!(!session.has_cart_id(CartId::new(5)).await.unwrap());
        assert!(session.has_cart_id(CartId::new(7)).await.unwrap());
    }
}
