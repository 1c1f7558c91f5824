//! Core types for Advanced Cart.
//!
//! This module provides type-safe wrappers for carts and the accounts that own them.

pub mod account;
pub mod cart;
pub mod id;
pub mod order_type;
pub mod status;

pub use account::Account;
pub use cart::{Cart, CartKey, NewCart};
pub use id::*;
pub use order_type::OrderType;
pub use status::*;
