//! Lifecycle facade: place and cancel orders, read boards and the registry.
//!
//! [`Engine`] ties an [`OrderFactory`], the [`OrderRegistry`] and one [`OrderBoard`] per side
//! together. All methods take `&self`; share the engine across threads as `Arc<Engine>`.
//!
//! Registry and board are updated as two separate atomic steps. Between them a reader can see
//! a placed order in the registry that is not yet on its board. Cancellation is decided by the
//! registry removal alone, so an order's quantity is retracted at most once.

use log::{error, info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::board::{BoardSnapshot, OrderBoard};
use crate::error::OrderBookError;
use crate::factory::OrderFactory;
use crate::registry::OrderRegistry;
use crate::types::{Order, OrderId, OrderRequest, Side};

#[derive(Debug)]
pub struct Engine {
    factory: OrderFactory,
    registry: Arc<OrderRegistry>,
    bids: Arc<OrderBoard>,
    asks: Arc<OrderBoard>,
}

impl Engine {
    /// Engine with fresh registry and boards, drawing ids from the process-wide sequence.
    pub fn new() -> Self {
        Self {
            factory: OrderFactory::new(),
            registry: Arc::new(OrderRegistry::new()),
            bids: Arc::new(OrderBoard::new(Side::Buy)),
            asks: Arc::new(OrderBoard::new(Side::Sell)),
        }
    }

    /// Engine over caller-owned parts. `bids` must be a buy board and `asks` a sell board.
    pub fn from_parts(
        factory: OrderFactory,
        registry: Arc<OrderRegistry>,
        bids: Arc<OrderBoard>,
        asks: Arc<OrderBoard>,
    ) -> Result<Self, OrderBookError> {
        for (board, expected) in [(&bids, Side::Buy), (&asks, Side::Sell)] {
            if board.side() != expected {
                return Err(OrderBookError::InvalidSide {
                    side: board.side().to_string(),
                });
            }
        }
        Ok(Self {
            factory,
            registry,
            bids,
            asks,
        })
    }

    pub fn factory(&self) -> &OrderFactory {
        &self.factory
    }

    pub fn board(&self, side: Side) -> &Arc<OrderBoard> {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    /// Registers the order, then adds it to its side's board.
    ///
    /// Fails with [`OrderBookError::DuplicateOrder`] if the id is already live, or
    /// [`OrderBookError::LevelOverflow`] if the board cannot take the quantity. Nothing is
    /// changed in either case.
    pub fn place(&self, order: Order) -> Result<OrderId, OrderBookError> {
        let order_id = order.id();
        self.registry.insert(order.clone())?;
        if let Err(e) = self.board(order.side()).post(&order) {
            self.registry.remove(order_id);
            warn!("order rejected by board order_id={}: {}", order_id, e);
            return Err(e);
        }
        info!(
            "order placed order_id={} user={} side={} quantity={} price={}",
            order_id,
            order.user(),
            order.side(),
            order.quantity(),
            order.price()
        );
        Ok(order_id)
    }

    /// Cancels a live order by id or by reference.
    ///
    /// Returns `Ok(false)` if the order is unknown or already cancelled. The only error is
    /// [`OrderBookError::InconsistentBoard`], meaning registry and board have diverged.
    pub fn cancel(&self, order_ref: impl Into<OrderId>) -> Result<bool, OrderBookError> {
        let order_id = order_ref.into();
        let Some(order) = self.registry.remove(order_id) else {
            return Ok(false);
        };
        if let Err(e) = self.board(order.side()).retract(&order) {
            error!("board out of sync with registry on cancel order_id={}: {}", order_id, e);
            return Err(e);
        }
        info!(
            "order canceled order_id={} side={} quantity={} price={}",
            order_id,
            order.side(),
            order.quantity(),
            order.price()
        );
        Ok(true)
    }

    /// Builds an order with this engine's factory and places it.
    pub fn submit(
        &self,
        user: &str,
        quantity: Decimal,
        price: Decimal,
        side: Side,
    ) -> Result<OrderId, OrderBookError> {
        let order = self.factory.make_order(user, quantity, price, side)?;
        self.place(order)
    }

    /// Same as [`Engine::submit`] for raw client input.
    pub fn submit_request(&self, request: &OrderRequest) -> Result<OrderId, OrderBookError> {
        let order = self.factory.make_order_from_request(request)?;
        self.place(order)
    }

    pub fn get_board(&self, side: Side) -> BoardSnapshot {
        self.board(side).snapshot()
    }

    /// Board by textual side (`buy` / `sell`); anything else is
    /// [`OrderBookError::InvalidSide`].
    pub fn get_board_named(&self, side: &str) -> Result<BoardSnapshot, OrderBookError> {
        let side: Side = side.parse()?;
        Ok(self.get_board(side))
    }

    pub fn lookup(&self, order_id: OrderId) -> Option<Order> {
        self.registry.lookup(order_id)
    }

    /// Live orders, ascending by id.
    pub fn live_orders(&self) -> Vec<Order> {
        self.registry.orders()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Highest buy price, if any.
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.best_price()
    }

    /// Lowest sell price, if any.
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.best_price()
    }

    /// `best_ask - best_bid` when both sides have levels. May be negative: nothing matches.
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()? - self.best_bid()?)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
