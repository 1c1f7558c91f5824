//! Current-cart resolution.
//!
//! A customer may keep any number of draft carts per store and order type, but
//! at most one of them is *current*: the one checkout and "add to cart" act on.
//! The others are *non-current* (archived) and are kept for history or because
//! the customer parked them.
//!
//! [`CurrentCartResolver`] answers "which cart is current?" and creates new
//! current carts. Persistence and the guest session are injected:
//!
//! - [`CartStore`] - loads, queries and saves cart orders
//! - [`CartSession`] - the cart ids of the anonymous visitor's session
//!
//! In-memory implementations of both live in [`memory`].

pub mod cache;
pub mod error;
pub mod memory;
pub mod resolver;
pub mod session;
pub mod store;

pub use cache::{CartCache, CartIndex};
pub use error::{BoxError, CartError};
pub use resolver::CurrentCartResolver;
pub use session::CartSession;
pub use store::{CartQuery, CartStore, SortOrder};
