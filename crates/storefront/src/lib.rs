//! Advanced cart storefront library.
//!
//! Cart listing and single-cart pages over the current-cart resolver, with a
//! `PostgreSQL` cart store and session-backed guest carts. Exposed as a
//! library so the CLI can share the database layer.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod views;
