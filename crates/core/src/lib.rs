//! Advanced Cart Core - cart types and the current-cart rule.
//!
//! This crate is shared by all Advanced Cart components:
//! - `storefront` - Cart listing pages backed by `PostgreSQL` and sessions
//! - `cli` - Command-line tools for migrations, settings and cart flags
//!
//! # Architecture
//!
//! The core crate contains types, traits and the resolution rule - no I/O, no
//! database access, no HTTP. Persistence and the anonymous session are
//! collaborators injected through the [`provider::CartStore`] and
//! [`provider::CartSession`] traits.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, order states, carts and accounts
//! - [`provider`] - [`provider::CurrentCartResolver`] and its collaborators

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod provider;
pub mod types;

pub use provider::{CartError, CartSession, CartStore, CurrentCartResolver};
pub use types::*;
