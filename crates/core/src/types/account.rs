//! The account a cart is resolved for.

use serde::{Deserialize, Serialize};

use super::id::CustomerId;

/// A customer account, or the anonymous visitor of the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    id: CustomerId,
}

impl Account {
    /// The visitor without an account. Their carts are tracked by session.
    pub const ANONYMOUS: Self = Self {
        id: CustomerId::ANONYMOUS,
    };

    /// A logged-in customer.
    #[must_use]
    pub const fn authenticated(id: CustomerId) -> Self {
        Self { id }
    }

    #[must_use]
    pub const fn id(&self) -> CustomerId {
        self.id
    }

    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        self.id.is_anonymous()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        !self.is_anonymous()
    }
}

impl From<Option<CustomerId>> for Account {
    fn from(id: Option<CustomerId>) -> Self {
        id.map_or(Self::ANONYMOUS, Self::authenticated)
    }
}
