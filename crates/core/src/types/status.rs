//! Order lifecycle states.

use serde::{Deserialize, Serialize};

/// Lifecycle state of an order.
///
/// Only [`OrderState::Draft`] orders can be carts; every other state belongs to
/// an order that has been placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    #[default]
    Draft,
    Validation,
    Fulfillment,
    Completed,
    Canceled,
}

impl OrderState {
    /// The value stored in the `state` column.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Validation => "validation",
            Self::Fulfillment => "fulfillment",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }
}

impl std::fmt::Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "validation" => Ok(Self::Validation),
            "fulfillment" => Ok(Self::Fulfillment),
            "completed" => Ok(Self::Completed),
            "canceled" => Ok(Self::Canceled),
            _ => Err(format!("invalid order state: {s}")),
        }
    }
}
