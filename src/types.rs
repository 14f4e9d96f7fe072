//! Core types: order ids, sides, the immutable [`Order`] value and raw [`OrderRequest`] input.
//!
//! [`Order`] has no public constructor. The only way to obtain one is through
//! [`crate::factory::OrderFactory`], which validates and normalizes every field.

use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

use crate::error::OrderBookError;

/// Unique order identifier. Assigned by [`crate::ids::IdGenerator`], starts at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&Order> for OrderId {
    fn from(order: &Order) -> Self {
        order.id
    }
}

/// Order side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Buy, Side::Sell];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }

    pub fn opposite(&self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = OrderBookError;

    /// Accepts `buy` / `sell` in any case, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            _ => Err(OrderBookError::InvalidSide { side: s.to_string() }),
        }
    }
}

/// A validated order. Immutable once built.
///
/// Quantity is stored at the factory's quantity scale (2 dp by default) and price at its
/// price scale (4 dp by default). Serializable for display; deliberately not deserializable.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Order {
    id: OrderId,
    user: String,
    quantity: Decimal,
    price: Decimal,
    side: Side,
}

impl Order {
    /// Only the factory calls this, after validation and rounding.
    pub(crate) fn new_unchecked(
        id: OrderId,
        user: String,
        quantity: Decimal,
        price: Decimal,
        side: Side,
    ) -> Self {
        Self {
            id,
            user,
            quantity,
            price,
            side,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn side(&self) -> Side {
        self.side
    }
}

/// Raw client input, e.g. one JSON object from a transport layer.
///
/// Every field is optional so that a missing field surfaces as a
/// [`crate::error::ValidationError`] naming it, rather than a deserialization failure.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OrderRequest {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub quantity: Option<Decimal>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub side: Option<String>,
}

impl OrderRequest {
    pub fn new(user: impl Into<String>, quantity: Decimal, price: Decimal, side: Side) -> Self {
        Self {
            user: Some(user.into()),
            quantity: Some(quantity),
            price: Some(price),
            side: Some(side.as_str().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_parses_case_insensitively() {
        assert_eq!("buy".parse::<Side>().unwrap(), Side::Buy);
        assert_eq!(" SELL ".parse::<Side>().unwrap(), Side::Sell);
        assert_eq!("Buy".parse::<Side>().unwrap(), Side::Buy);
    }

    #[test]
    fn side_parse_rejects_unknown() {
        let err = "hold".parse::<Side>().unwrap_err();
        assert_eq!(err, OrderBookError::InvalidSide { side: "hold".into() });
    }

    #[test]
    fn side_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Side::Sell).unwrap(), "\"sell\"");
        assert_eq!(Side::Buy.opposite(), Side::Sell);
    }

    #[test]
    fn order_request_missing_fields_deserialize_as_none() {
        let req: OrderRequest = serde_json::from_str(r#"{"user":"alice","side":"buy"}"#).unwrap();
        assert_eq!(req.user.as_deref(), Some("alice"));
        assert!(req.quantity.is_none());
        assert!(req.price.is_none());
    }
}
