//! Account extraction.
//!
//! Every cart route runs for guests as well as logged-in customers, so the
//! extractor never rejects a missing login; it resolves to the anonymous
//! account instead.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use advanced_cart_core::Account;

use crate::error::{AppError, set_sentry_user};
use crate::models::CurrentUser;
use crate::models::session::keys;

/// The requesting account together with its session.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentAccount { account, .. }: CurrentAccount) -> String {
///     if account.is_anonymous() {
///         "Hello, guest!".to_string()
///     } else {
///         format!("Hello, customer {}!", account.id())
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentAccount {
    pub account: Account,
    pub session: Session,
}

impl<S> FromRequestParts<S> for CurrentAccount
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let user = session
            .get::<CurrentUser>(keys::CURRENT_USER)
            .await
            .map_err(AppError::Session)?;
        let account = user.map_or(Account::ANONYMOUS, Account::from);
        if account.is_authenticated() {
            set_sentry_user(account.id());
        }

        Ok(Self { account, session })
    }
}
