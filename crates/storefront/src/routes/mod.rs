//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                   - Liveness check
//! GET  /health/ready             - Readiness check (database)
//!
//! # Carts
//! GET  /cart                     - Cart listing (current, then saved carts)
//! POST /cart                     - Create a cart
//! GET  /cart/{cart_id}           - Single cart page
//! POST /cart/{cart_id}/archive   - Save a cart for later
//! POST /cart/{cart_id}/restore   - Make a saved cart current again
//! ```

pub mod carts;
pub mod health;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the health check router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::health))
        .route("/ready", get(health::readiness))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(carts::index).post(carts::create))
        .route("/{cart_id}", get(carts::show))
        .route("/{cart_id}/archive", post(carts::archive))
        .route("/{cart_id}/restore", post(carts::restore))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/health", health_routes())
        .nest("/cart", cart_routes())
}
