//! Order factory: the only way to build an [`Order`].
//!
//! Validates client fields, rounds quantity to [`QUANTITY_SCALE`] and price to [`PRICE_SCALE`]
//! decimal places half-up, and takes the next id from its [`IdGenerator`]. A rejected order
//! never consumes an id.

use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::{Arc, OnceLock};

use crate::error::{OrderField, ValidationError};
use crate::ids::IdGenerator;
use crate::types::{Order, OrderRequest, Side};

/// Fractional digits stored on every order quantity.
pub const QUANTITY_SCALE: u32 = 2;
/// Fractional digits stored on every order price.
pub const PRICE_SCALE: u32 = 4;

static GLOBAL: OnceLock<OrderFactory> = OnceLock::new();

/// Half-up (midpoint away from zero) rounding to `scale` fractional digits.
///
/// The result has exactly `scale` digits unless the value is too large to carry them, in
/// which case its scale is lower.
pub fn round_half_up(value: Decimal, scale: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    // round_dp keeps a shorter scale as-is; pad so `10` is stored as `10.00`.
    rounded.rescale(scale);
    rounded
}

#[derive(Clone, Debug)]
pub struct OrderFactory {
    ids: Arc<IdGenerator>,
}

impl OrderFactory {
    /// Factory drawing ids from [`IdGenerator::global`], so its ids never collide with any
    /// other factory built this way or with [`make_order`].
    pub fn new() -> Self {
        Self::with_ids(IdGenerator::global())
    }

    /// Factory drawing ids from the given generator. Ids are unique only within it.
    pub fn with_ids(ids: Arc<IdGenerator>) -> Self {
        Self { ids }
    }

    /// The process-wide factory behind [`make_order`].
    pub fn global() -> &'static OrderFactory {
        GLOBAL.get_or_init(OrderFactory::new)
    }

    pub fn make_order(
        &self,
        user: &str,
        quantity: Decimal,
        price: Decimal,
        side: Side,
    ) -> Result<Order, ValidationError> {
        if user.trim().is_empty() {
            return Err(ValidationError::new(OrderField::User, "must not be blank"));
        }
        let quantity = normalize(OrderField::Quantity, quantity, QUANTITY_SCALE)?;
        let price = normalize(OrderField::Price, price, PRICE_SCALE)?;
        let id = self.ids.next_id();
        Ok(Order::new_unchecked(id, user.to_string(), quantity, price, side))
    }

    /// Builds an order from raw client input. Missing fields and unknown sides are
    /// reported as [`ValidationError`]s naming the field.
    pub fn make_order_from_request(&self, request: &OrderRequest) -> Result<Order, ValidationError> {
        let user = request
            .user
            .as_deref()
            .ok_or_else(|| ValidationError::missing(OrderField::User))?;
        let quantity = request
            .quantity
            .ok_or_else(|| ValidationError::missing(OrderField::Quantity))?;
        let price = request
            .price
            .ok_or_else(|| ValidationError::missing(OrderField::Price))?;
        let side = request
            .side
            .as_deref()
            .ok_or_else(|| ValidationError::missing(OrderField::Side))?;
        let side: Side = side
            .parse()
            .map_err(|_| ValidationError::new(OrderField::Side, format!("expected buy or sell, got {:?}", side)))?;
        self.make_order(user, quantity, price, side)
    }
}

impl Default for OrderFactory {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(field: OrderField, value: Decimal, scale: u32) -> Result<Decimal, ValidationError> {
    if value <= Decimal::ZERO {
        return Err(ValidationError::new(field, format!("must be positive, got {}", value)));
    }
    let rounded = round_half_up(value, scale);
    if rounded.scale() != scale {
        return Err(ValidationError::new(
            field,
            format!("{} is too large to keep {} decimal places", value, scale),
        ));
    }
    if rounded.is_zero() {
        return Err(ValidationError::new(
            field,
            format!("{} rounds to zero at {} decimal places", value, scale),
        ));
    }
    Ok(rounded)
}

/// Builds an order with the process-wide factory.
pub fn make_order(user: &str, quantity: Decimal, price: Decimal, side: Side) -> Result<Order, ValidationError> {
    OrderFactory::global().make_order(user, quantity, price, side)
}
