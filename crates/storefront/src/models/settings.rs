//! Persisted cart settings.

use serde::{Deserialize, Serialize};

/// Name the cart settings are stored under in `commerce_settings`.
pub const CART_SETTINGS_NAME: &str = "commerce_cart_advanced.settings";

/// Cart page settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartSettings {
    /// Whether the cart page lists non-current carts below the current ones.
    pub display_non_current_carts: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_default_to_false() {
        let settings: CartSettings = serde_json::from_str("{}").unwrap();
        assert!(!settings.display_non_current_carts);
    }

    #[test]
    fn test_roundtrip_through_json() {
        let value = serde_json::json!({ "display_non_current_carts": true });
        let settings: CartSettings = serde_json::from_value(value.clone()).unwrap();
        assert!(settings.display_non_current_carts);
        assert_eq!(serde_json::to_value(settings).unwrap(), value);
    }
}
