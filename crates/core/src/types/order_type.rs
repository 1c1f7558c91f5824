//! Order type bundle names.

use serde::{Deserialize, Serialize};

/// Classification of an order (`default`, `b2b`, ...).
///
/// Decides checkout behaviour and which view renders the cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderType(String);

impl OrderType {
    /// The order type every store ships with.
    pub const DEFAULT: &'static str = "default";

    /// Create an order type from its machine name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the machine name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for OrderType {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for OrderType {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for OrderType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
