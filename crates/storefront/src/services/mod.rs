//! Business logic services for storefront.
//!
//! # Services
//!
//! - `carts` - Access checks and archive/restore of carts
//! - `cart_session` - Anonymous cart ids kept in the visitor's session
//! - `settings` - Cached access to the persisted cart settings

pub mod cart_session;
pub mod carts;
pub mod settings;

pub use cart_session::SessionCartIds;
pub use carts::{CartAccess, archive_cart, check_access, restore_cart, split_carts};
pub use settings::SettingsService;
