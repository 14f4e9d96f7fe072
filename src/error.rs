//! Error taxonomy for order construction and the lifecycle protocol.

use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

use crate::types::{OrderId, Side};

/// Order field named by a [`ValidationError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderField {
    User,
    Quantity,
    Price,
    Side,
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderField::User => "user",
            OrderField::Quantity => "quantity",
            OrderField::Price => "price",
            OrderField::Side => "side",
        };
        f.write_str(name)
    }
}

/// Malformed client input. The order is not built and no id is consumed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: OrderField,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: OrderField, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    pub fn missing(field: OrderField) -> Self {
        Self::new(field, "missing")
    }
}

/// Errors from the registry, the boards and the lifecycle protocol.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderBookError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("order {order_id} is already registered")]
    DuplicateOrder { order_id: OrderId },

    #[error("invalid side: {side:?}")]
    InvalidSide { side: String },

    /// Registry and board disagree. Not a user error.
    #[error("inconsistent {side} board at price {price}: {reason}")]
    InconsistentBoard {
        side: Side,
        price: Decimal,
        reason: String,
    },

    /// Posting would push a level's aggregate past what fits at the order's scale.
    #[error("aggregate quantity overflow on {side} board at price {price}")]
    LevelOverflow { side: Side, price: Decimal },
}

impl OrderBookError {
    pub fn is_validation(&self) -> bool {
        matches!(self, OrderBookError::Validation(_))
    }
}
