//! The current-cart resolver.

use tracing::{debug, info, instrument};

use super::cache::{CartCache, CartIndex};
use super::error::CartError;
use super::session::CartSession;
use super::store::{CartQuery, CartStore};
use crate::types::{Account, Cart, CartId, NewCart, OrderState, OrderType, StoreId};

/// Resolves and creates the current cart of an account.
///
/// A resolver serves one request or session. It caches the cart indices it
/// builds; code that changes cart flags behind its back must call
/// [`CurrentCartResolver::clear_caches`].
///
/// # Example
///
/// ```rust
/// # use advanced_cart_core::provider::memory::{InMemoryCartSession, InMemoryCartStore};
/// # use advanced_cart_core::{Account, CurrentCartResolver, CustomerId, OrderType, StoreId};
/// # tokio_test_block(async {
/// let mut resolver = CurrentCartResolver::new(InMemoryCartStore::new(), InMemoryCartSession::new());
/// let account = Account::authenticated(CustomerId::new(42));
/// let order_type = OrderType::new("default");
///
/// let cart = resolver.create_cart(order_type.clone(), StoreId::new(1), &account).await?;
/// let current = resolver.current_cart_id(&order_type, StoreId::new(1), &account).await?;
/// assert_eq!(current, Some(cart.id));
/// # Ok::<(), advanced_cart_core::CartError>(())
/// # }).unwrap();
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug)]
pub struct CurrentCartResolver<S, C> {
    store: S,
    session: C,
    cache: CartCache,
}

impl<S, C> CurrentCartResolver<S, C> {
    /// Create a resolver with empty caches.
    #[must_use]
    pub fn new(store: S, session: C) -> Self {
        Self {
            store,
            session,
            cache: CartCache::new(),
        }
    }

    /// The cart store the resolver reads from.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The anonymous cart session.
    #[must_use]
    pub const fn session(&self) -> &C {
        &self.session
    }

    /// Drop every cached index.
    ///
    /// Call after changing a cart's current/non-current flag, lock or state.
    pub fn clear_caches(&mut self) {
        self.cache.invalidate();
    }
}

impl<S, C> CurrentCartResolver<S, C>
where
    S: CartStore,
    C: CartSession,
{
    /// The id of the account's current cart for the order type and store.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` or `CartError::Session` if a collaborator fails.
    #[instrument(skip(self), fields(customer_id = %account.id()))]
    pub async fn current_cart_id(
        &mut self,
        order_type: &OrderType,
        store_id: StoreId,
        account: &Account,
    ) -> Result<Option<CartId>, CartError> {
        self.ensure_current_index(account).await?;

        Ok(self
            .cache
            .current(account.id())
            .and_then(|index| index.find(order_type, store_id)))
    }

    /// The account's current cart for the order type and store.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` or `CartError::Session` if a collaborator fails.
    pub async fn current_cart(
        &mut self,
        order_type: &OrderType,
        store_id: StoreId,
        account: &Account,
    ) -> Result<Option<Cart>, CartError> {
        match self.current_cart_id(order_type, store_id, account).await? {
            Some(id) => self.store.load(id).await.map_err(CartError::store),
            None => Ok(None),
        }
    }

    /// Create a new current cart for the account.
    ///
    /// Archived carts for the same order type and store do not block creation;
    /// only a current one does.
    ///
    /// # Errors
    ///
    /// Returns `CartError::DuplicateCurrentCart` if the account already has a
    /// current cart for the order type and store.
    /// Returns `CartError::Store` or `CartError::Session` if a collaborator fails.
    #[instrument(skip(self), fields(customer_id = %account.id()))]
    pub async fn create_cart(
        &mut self,
        order_type: OrderType,
        store_id: StoreId,
        account: &Account,
    ) -> Result<Cart, CartError> {
        if self
            .current_cart_id(&order_type, store_id, account)
            .await?
            .is_some()
        {
            return Err(CartError::DuplicateCurrentCart {
                order_type,
                store_id,
                customer_id: account.id(),
            });
        }

        let cart = self
            .store
            .create(NewCart::new(order_type, store_id, account.id()))
            .await
            .map_err(CartError::store)?;

        // Guests find their carts again through the session.
        if account.is_anonymous() {
            self.session
                .add_cart_id(cart.id)
                .await
                .map_err(CartError::session)?;
        }

        self.cache.record_new_cart(&cart);

        info!(cart_id = %cart.id, "Created cart");
        Ok(cart)
    }

    /// Ids of every cart of the account, current or not, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` or `CartError::Session` if a collaborator fails.
    pub async fn cart_ids(&mut self, account: &Account) -> Result<Vec<CartId>, CartError> {
        self.ensure_all_index(account).await?;

        Ok(self
            .cache
            .all(account.id())
            .map(|index| index.ids().collect())
            .unwrap_or_default())
    }

    /// Every cart of the account, current or not, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` or `CartError::Session` if a collaborator fails.
    pub async fn carts(&mut self, account: &Account) -> Result<Vec<Cart>, CartError> {
        let ids = self.cart_ids(account).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        self.store
            .load_multiple(&ids)
            .await
            .map_err(CartError::store)
    }

    /// Whether the cart is the current cart of its owner for its order type and
    /// store.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` or `CartError::Session` if a collaborator fails.
    pub async fn is_current(&mut self, cart: &Cart) -> Result<bool, CartError> {
        let owner = Account::authenticated(cart.customer_id);
        let current = self
            .current_cart_id(&cart.order_type, cart.store_id, &owner)
            .await?;

        Ok(current == Some(cart.id))
    }

    async fn ensure_current_index(&mut self, account: &Account) -> Result<(), CartError> {
        let customer_id = account.id();
        if self.cache.current(customer_id).is_some() {
            return Ok(());
        }

        if account.is_authenticated() {
            let index = self
                .query_index(&CartQuery::current_carts(customer_id))
                .await?;
            self.cache.set_current(customer_id, index);
        } else {
            self.load_session_indices().await?;
        }

        Ok(())
    }

    async fn ensure_all_index(&mut self, account: &Account) -> Result<(), CartError> {
        let customer_id = account.id();
        if self.cache.all(customer_id).is_some() {
            return Ok(());
        }

        if account.is_authenticated() {
            let index = self
                .query_index(&CartQuery::eligible_carts(customer_id))
                .await?;
            self.cache.set_all(customer_id, index);
        } else {
            self.load_session_indices().await?;
        }

        Ok(())
    }

    async fn query_index(&self, query: &CartQuery) -> Result<CartIndex, CartError> {
        let carts = self.store.query(query).await.map_err(CartError::store)?;
        debug!(carts = carts.len(), "Loaded cart index");

        Ok(carts.iter().collect())
    }

    /// Build the guest's index from the session and drop stale session entries.
    ///
    /// The non-current flag is not applied here: every eligible guest cart
    /// counts as current.
    async fn load_session_indices(&mut self) -> Result<(), CartError> {
        let ids = self.session.cart_ids().await.map_err(CartError::session)?;

        let mut index = CartIndex::new();
        if !ids.is_empty() {
            let carts = self
                .store
                .load_multiple(&ids)
                .await
                .map_err(CartError::store)?;

            // Newest first, like the authenticated query.
            for id in ids.iter().rev() {
                let Some(cart) = carts.iter().find(|cart| cart.id == *id) else {
                    debug!(cart_id = %id, "Removing deleted cart from session");
                    self.session
                        .delete_cart_id(*id)
                        .await
                        .map_err(CartError::session)?;
                    continue;
                };

                // The customer is probably off-site for payment; keep the id.
                if cart.locked {
                    continue;
                }

                if !cart.customer_id.is_anonymous()
                    || !cart.is_cart
                    || cart.state != OrderState::Draft
                {
                    debug!(cart_id = %id, "Removing ineligible cart from session");
                    self.session
                        .delete_cart_id(*id)
                        .await
                        .map_err(CartError::session)?;
                    continue;
                }

                index.insert(cart.id, cart.key());
            }
        }

        let customer_id = Account::ANONYMOUS.id();
        self.cache.set_all(customer_id, index.clone());
        self.cache.set_current(customer_id, index);

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::provider::memory::{InMemoryCartSession, InMemoryCartStore};
    use crate::types::CustomerId;

    fn default_type() -> OrderType {
        OrderType::new("default")
    }

    fn customer() -> Account {
        Account::authenticated(CustomerId::new(42))
    }

    fn resolver(
        store: InMemoryCartStore,
        session: InMemoryCartSession,
    ) -> CurrentCartResolver<InMemoryCartStore, InMemoryCartSession> {
        CurrentCartResolver::new(store, session)
    }

    #[tokio::test]
    async fn test_no_carts_resolves_to_none() {
        let mut resolver = resolver(InMemoryCartStore::new(), InMemoryCartSession::new());

        for store_id in [1, 2] {
            for order_type in ["default", "b2b"] {
                let id = resolver
                    .current_cart_id(&OrderType::new(order_type), StoreId::new(store_id), &customer())
                    .await
                    .unwrap();
                assert_eq!(id, None);
            }
        }
    }

    #[tokio::test]
    async fn test_resolves_single_current_cart() {
        let store = InMemoryCartStore::new();
        let cart = store.insert_cart(42, 1, "default").build();

        let mut resolver = resolver(store, InMemoryCartSession::new());
        let id = resolver
            .current_cart_id(&default_type(), StoreId::new(1), &customer())
            .await
            .unwrap();

        assert_eq!(id, Some(cart.id));
    }

    #[tokio::test]
    async fn test_archived_and_locked_carts_are_not_current() {
        let store = InMemoryCartStore::new();
        store.insert_cart(42, 1, "default").non_current().build();
        store.insert_cart(42, 1, "default").locked().build();
        store.insert_cart(42, 1, "default").locked().non_current().build();

        let mut resolver = resolver(store, InMemoryCartSession::new());
        let id = resolver
            .current_cart_id(&default_type(), StoreId::new(1), &customer())
            .await
            .unwrap();

        assert_eq!(id, None);
    }

    #[tokio::test]
    async fn test_placed_orders_are_not_current() {
        let store = InMemoryCartStore::new();
        store
            .insert_cart(42, 1, "default")
            .state(OrderState::Completed)
            .build();
        store.insert_cart(42, 1, "default").not_cart().build();

        let mut resolver = resolver(store, InMemoryCartSession::new());
        let id = resolver
            .current_cart_id(&default_type(), StoreId::new(1), &customer())
            .await
            .unwrap();

        assert_eq!(id, None);
    }

    #[tokio::test]
    async fn test_highest_id_wins_between_current_carts() {
        let store = InMemoryCartStore::new();
        store.insert_cart(42, 1, "default").build();
        let newer = store.insert_cart(42, 1, "default").build();

        let mut resolver = resolver(store, InMemoryCartSession::new());
        let id = resolver
            .current_cart_id(&default_type(), StoreId::new(1), &customer())
            .await
            .unwrap();

        assert_eq!(id, Some(newer.id));
    }

    #[tokio::test]
    async fn test_lookup_queries_once_until_caches_cleared() {
        let store = InMemoryCartStore::new();
        store.insert_cart(42, 1, "default").build();

        let mut resolver = resolver(store, InMemoryCartSession::new());
        let first = resolver
            .current_cart_id(&default_type(), StoreId::new(1), &customer())
            .await
            .unwrap();
        let second = resolver
            .current_cart_id(&default_type(), StoreId::new(1), &customer())
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(resolver.store().query_count(), 1);

        resolver.clear_caches();
        resolver
            .current_cart_id(&default_type(), StoreId::new(1), &customer())
            .await
            .unwrap();
        assert_eq!(resolver.store().query_count(), 2);
    }

    #[tokio::test]
    async fn test_flag_change_needs_clear_caches() {
        let store = InMemoryCartStore::new();
        let cart = store.insert_cart(42, 1, "default").build();

        let mut resolver = resolver(store, InMemoryCartSession::new());
        resolver
            .current_cart_id(&default_type(), StoreId::new(1), &customer())
            .await
            .unwrap();

        let archived = Cart {
            non_current: true,
            ..cart.clone()
        };
        resolver.store().save(&archived).await.unwrap();

        // Stale until the caches are cleared.
        let stale = resolver
            .current_cart_id(&default_type(), StoreId::new(1), &customer())
            .await
            .unwrap();
        assert_eq!(stale, Some(cart.id));

        resolver.clear_caches();
        let fresh = resolver
            .current_cart_id(&default_type(), StoreId::new(1), &customer())
            .await
            .unwrap();
        assert_eq!(fresh, None);
    }

    #[tokio::test]
    async fn test_current_cart_loads_entity() {
        let store = InMemoryCartStore::new();
        let cart = store.insert_cart(42, 1, "default").items(3).build();

        let mut resolver = resolver(store, InMemoryCartSession::new());
        let loaded = resolver
            .current_cart(&default_type(), StoreId::new(1), &customer())
            .await
            .unwrap();
        assert_eq!(loaded, Some(cart));

        let missing = resolver
            .current_cart(&OrderType::new("b2b"), StoreId::new(1), &customer())
            .await
            .unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_create_cart_rejects_duplicate_current_cart() {
        let store = InMemoryCartStore::new();
        store.insert_cart(42, 1, "default").build();
        store.insert_cart(42, 1, "default").non_current().build();

        let mut resolver = resolver(store, InMemoryCartSession::new());
        let err = resolver
            .create_cart(default_type(), StoreId::new(1), &customer())
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::DuplicateCurrentCart { .. }));
        assert_eq!(resolver.store().len(), 2);
    }

    #[tokio::test]
    async fn test_create_cart_allowed_next_to_archived_carts() {
        let store = InMemoryCartStore::new();
        store.insert_cart(42, 1, "default").non_current().build();
        store.insert_cart(42, 1, "default").non_current().build();

        let mut resolver = resolver(store, InMemoryCartSession::new());
        let cart = resolver
            .create_cart(default_type(), StoreId::new(1), &customer())
            .await
            .unwrap();

        assert_eq!(cart.customer_id, CustomerId::new(42));
        assert_eq!(cart.state, OrderState::Draft);
        assert!(cart.is_cart);
        assert!(!cart.non_current);
        assert_eq!(resolver.store().len(), 3);
    }

    #[tokio::test]
    async fn test_created_cart_is_visible_without_requery() {
        let mut resolver = resolver(InMemoryCartStore::new(), InMemoryCartSession::new());

        // Build both indices first.
        resolver.cart_ids(&customer()).await.unwrap();
        resolver
            .current_cart_id(&default_type(), StoreId::new(1), &customer())
            .await
            .unwrap();
        let queries = resolver.store().query_count();

        let cart = resolver
            .create_cart(default_type(), StoreId::new(1), &customer())
            .await
            .unwrap();

        let current = resolver
            .current_cart_id(&default_type(), StoreId::new(1), &customer())
            .await
            .unwrap();
        let all = resolver.cart_ids(&customer()).await.unwrap();

        assert_eq!(current, Some(cart.id));
        assert_eq!(all, vec![cart.id]);
        assert_eq!(resolver.store().query_count(), queries);

        let err = resolver
            .create_cart(default_type(), StoreId::new(1), &customer())
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::DuplicateCurrentCart { .. }));
    }

    #[tokio::test]
    async fn test_created_cart_leads_loaded_cart_list() {
        let store = InMemoryCartStore::new();
        let archived = store.insert_cart(42, 1, "default").non_current().build();
        let mut resolver = resolver(store, InMemoryCartSession::new());

        assert_eq!(
            resolver.cart_ids(&customer()).await.unwrap(),
            vec![archived.id]
        );

        let cart = resolver
            .create_cart(default_type(), StoreId::new(1), &customer())
            .await
            .unwrap();
        let queries = resolver.store().query_count();

        assert_eq!(
            resolver.cart_ids(&customer()).await.unwrap(),
            vec![cart.id, archived.id]
        );
        assert_eq!(resolver.store().query_count(), queries);
        let carts = resolver.carts(&customer()).await.unwrap();
        assert_eq!(carts.first().map(|c| c.id), Some(cart.id));
    }

    #[tokio::test]
    async fn test_anonymous_create_cart_records_session() {
        let session = InMemoryCartSession::new();
        let mut resolver = resolver(InMemoryCartStore::new(), session.clone());

        let cart = resolver
            .create_cart(default_type(), StoreId::new(1), &Account::ANONYMOUS)
            .await
            .unwrap();

        assert_eq!(cart.customer_id, CustomerId::ANONYMOUS);
        assert!(session.has_cart_id(cart.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_authenticated_create_cart_leaves_session_alone() {
        let session = InMemoryCartSession::new();
        let mut resolver = resolver(InMemoryCartStore::new(), session.clone());

        resolver
            .create_cart(default_type(), StoreId::new(1), &customer())
            .await
            .unwrap();

        assert!(session.cart_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_anonymous_index_removes_stale_session_entries() {
        let store = InMemoryCartStore::new();
        let guest = store.insert_cart(0, 1, "default").build();
        let foreign = store.insert_cart(7, 1, "b2b").build();
        let placed = store
            .insert_cart(0, 1, "b2b")
            .state(OrderState::Completed)
            .build();
        let session =
            InMemoryCartSession::with_cart_ids([guest.id, foreign.id, placed.id, CartId::new(999)]);

        let mut resolver = resolver(store, session.clone());
        let current = resolver
            .current_cart_id(&default_type(), StoreId::new(1), &Account::ANONYMOUS)
            .await
            .unwrap();
        let foreign_lookup = resolver
            .current_cart_id(&OrderType::new("b2b"), StoreId::new(1), &Account::ANONYMOUS)
            .await
            .unwrap();

        assert_eq!(current, Some(guest.id));
        assert_eq!(foreign_lookup, None);
        assert_eq!(session.cart_ids().await.unwrap(), vec![guest.id]);
    }

    #[tokio::test]
    async fn test_anonymous_locked_cart_skipped_but_kept_in_session() {
        let store = InMemoryCartStore::new();
        let locked = store.insert_cart(0, 1, "default").locked().build();
        let session = InMemoryCartSession::with_cart_ids([locked.id]);

        let mut resolver = resolver(store, session.clone());
        let current = resolver
            .current_cart_id(&default_type(), StoreId::new(1), &Account::ANONYMOUS)
            .await
            .unwrap();

        assert_eq!(current, None);
        assert_eq!(session.cart_ids().await.unwrap(), vec![locked.id]);
    }

    #[tokio::test]
    async fn test_anonymous_path_ignores_non_current_flag() {
        let store = InMemoryCartStore::new();
        let parked = store.insert_cart(0, 1, "default").non_current().build();
        let session = InMemoryCartSession::with_cart_ids([parked.id]);

        let mut resolver = resolver(store, session);
        let current = resolver
            .current_cart_id(&default_type(), StoreId::new(1), &Account::ANONYMOUS)
            .await
            .unwrap();

        assert_eq!(current, Some(parked.id));
    }

    #[tokio::test]
    async fn test_carts_lists_current_and_archived_newest_first() {
        let store = InMemoryCartStore::new();
        let older = store.insert_cart(42, 1, "default").non_current().build();
        let newer = store.insert_cart(42, 1, "default").build();
        store.insert_cart(42, 1, "default").locked().build();
        store.insert_cart(7, 1, "default").build();

        let mut resolver = resolver(store, InMemoryCartSession::new());
        let carts = resolver.carts(&customer()).await.unwrap();

        let ids: Vec<_> = carts.iter().map(|cart| cart.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
        assert!(resolver.is_current(&newer).await.unwrap());
        assert!(!resolver.is_current(&older).await.unwrap());
    }
}
