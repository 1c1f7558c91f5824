//! Integration tests for advanced cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p advanced-cart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `current_cart_resolution` - Resolver behaviour through the public API,
//!   over the in-memory store and session
//! - `cart_lifecycle` - Creating, archiving and restoring carts across
//!   resolvers

use advanced_cart_core::provider::memory::{InMemoryCartSession, InMemoryCartStore};
use advanced_cart_core::{Account, CurrentCartResolver, CustomerId};

/// Resolver over the in-memory collaborators.
pub type TestResolver = CurrentCartResolver<InMemoryCartStore, InMemoryCartSession>;

/// A resolver sharing state with the given store and session handles.
#[must_use]
pub fn resolver(store: &InMemoryCartStore, session: &InMemoryCartSession) -> TestResolver {
    CurrentCartResolver::new(store.clone(), session.clone())
}

/// A logged-in customer.
#[must_use]
pub const fn customer(id: i32) -> Account {
    Account::authenticated(CustomerId::new(id))
}
