//! Anonymous cart ids stored in the tower-sessions session.

use tower_sessions::Session;
use tower_sessions::session::Error as SessionError;

use advanced_cart_core::CartId;
use advanced_cart_core::provider::CartSession;

use crate::models::session::keys;

/// The list of cart ids under [`keys::CART_IDS`] in the visitor's session.
#[derive(Debug, Clone)]
pub struct SessionCartIds {
    session: Session,
}

impl SessionCartIds {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    async fn store(&self, ids: &[CartId]) -> Result<(), SessionError> {
        if ids.is_empty() {
            self.session.remove_value(keys::CART_IDS).await?;
            return Ok(());
        }
        self.session.insert(keys::CART_IDS, ids).await
    }
}

impl CartSession for SessionCartIds {
    type Error = SessionError;

    async fn cart_ids(&self) -> Result<Vec<CartId>, Self::Error> {
        Ok(self
            .session
            .get::<Vec<CartId>>(keys::CART_IDS)
            .await?
            .unwrap_or_default())
    }

    async fn add_cart_id(&self, cart_id: CartId) -> Result<(), Self::Error> {
        let mut ids = self.cart_ids().await?;
        if ids.contains(&cart_id) {
            return Ok(());
        }
        ids.push(cart_id);
        self.store(&ids).await
    }

    async fn delete_cart_id(&self, cart_id: CartId) -> Result<(), Self::Error> {
        let mut ids = self.cart_ids().await?;
        let before = ids.len();
        ids.retain(|id| *id != cart_id);
        if ids.len() == before {
            return Ok(());
        }
        self.store(&ids).await
    }

    async fn has_cart_id(&self, cart_id: CartId) -> Result<bool, Self::Error> {
        Ok(self.cart_ids().await?.contains(&cart_id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> SessionCartIds {
        SessionCartIds::new(Session::new(None, Arc::new(MemoryStore::default()), None))
    }

    #[tokio::test]
    async fn test_empty_session_has_no_carts() {
        let carts = session();
        assert!(carts.cart_ids().await.unwrap().is_empty());
        assert!(!carts.has_cart_id(CartId::new(5)).await.unwrap());
    }

    #[tokio::test]
    async fn test_add_and_delete_cart_ids() {
        let carts = session();
        carts.add_cart_id(CartId::new(5)).await.unwrap();
        carts.add_cart_id(CartId::new(7)).await.unwrap();
        carts.add_cart_id(CartId::new(5)).await.unwrap();

        assert_eq!(
            carts.cart_ids().await.unwrap(),
            vec![CartId::new(5), CartId::new(7)]
        );

        carts.delete_cart_id(CartId::new(5)).await.unwrap();
        carts.delete_cart_id(CartId::new(99)).await.unwrap();
        assert_eq!(carts.cart_ids().await.unwrap(), vec![CartId::new(7)]);
    }

    #[tokio::test]
    async fn test_deleting_last_id_removes_key() {
        let carts = session();
        carts.add_cart_id(CartId::new(5)).await.unwrap();
        carts.delete_cart_id(CartId::new(5)).await.unwrap();

        let raw = carts
            .session
            .get::<Vec<CartId>>(keys::CART_IDS)
            .await
            .unwrap();
        assert!(raw.is_none());
    }
}
