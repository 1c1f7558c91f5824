//! Domain models for storefront.
//!
//! Cart types live in `advanced_cart_core`; these are the storefront-only
//! shapes stored in the session and the settings table.

pub mod session;
pub mod settings;

pub use session::CurrentUser;
pub use settings::CartSettings;
