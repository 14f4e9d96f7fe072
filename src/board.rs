//! Per-side aggregation board: price → total live quantity.
//!
//! The buy board lists the highest price first, the sell board the lowest. A level exists
//! only while its aggregate is positive; retracting the last quantity removes it.

use log::debug;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::error::OrderBookError;
use crate::swap::SwapCell;
use crate::types::{Order, Side};

/// Price → aggregate quantity. Ascending by price regardless of side.
type Levels = BTreeMap<Decimal, Decimal>;

/// One price level on one side.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct BoardEntry {
    pub price: Decimal,
    pub side: Side,
    pub aggregate_quantity: Decimal,
}

/// Read-only copy of a board, best price first. Later writes to the board are not reflected.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct BoardSnapshot {
    side: Side,
    levels: Vec<BoardEntry>,
}

impl BoardSnapshot {
    fn from_levels(side: Side, levels: &Levels) -> Self {
        let entry = |(price, qty): (&Decimal, &Decimal)| BoardEntry {
            price: *price,
            side,
            aggregate_quantity: *qty,
        };
        let levels = match side {
            Side::Buy => levels.iter().rev().map(entry).collect(),
            Side::Sell => levels.iter().map(entry).collect(),
        };
        Self { side, levels }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn levels(&self) -> &[BoardEntry] {
        &self.levels
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoardEntry> {
        self.levels.iter()
    }

    /// Aggregate quantity at `price`, if that level exists.
    pub fn get(&self, price: Decimal) -> Option<Decimal> {
        self.levels
            .iter()
            .find(|e| e.price == price)
            .map(|e| e.aggregate_quantity)
    }

    pub fn contains_price(&self, price: Decimal) -> bool {
        self.get(price).is_some()
    }

    /// The `n` best levels.
    pub fn depth(&self, n: usize) -> &[BoardEntry] {
        &self.levels[..n.min(self.levels.len())]
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn total_quantity(&self) -> Decimal {
        self.levels.iter().map(|e| e.aggregate_quantity).sum()
    }

    /// Plain price → quantity map (ascending keys).
    pub fn into_map(self) -> BTreeMap<Decimal, Decimal> {
        self.levels
            .into_iter()
            .map(|e| (e.price, e.aggregate_quantity))
            .collect()
    }
}

/// Aggregated quantity per price level for one side.
#[derive(Debug)]
pub struct OrderBoard {
    side: Side,
    levels: SwapCell<Levels>,
}

impl OrderBoard {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: SwapCell::new(Levels::new()),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Adds the order's quantity at its price, creating the level if needed.
    /// Returns the level's new aggregate.
    ///
    /// Fails with [`OrderBookError::LevelOverflow`] if the sum cannot be held at the
    /// quantity's scale; the board is left unchanged.
    pub fn post(&self, order: &Order) -> Result<Decimal, OrderBookError> {
        self.check_side(order)?;
        let side = self.side;
        let price = order.price();
        let quantity = order.quantity();
        let aggregate = self.levels.update(|current| {
            let level = current.get(&price).copied().unwrap_or(Decimal::ZERO);
            // checked_add drops fractional digits before it reports overflow
            let aggregate = level
                .checked_add(quantity)
                .filter(|sum| sum.scale() >= quantity.scale())
                .ok_or(OrderBookError::LevelOverflow { side, price })?;
            let mut next = current.clone();
            next.insert(price, aggregate);
            Ok::<_, OrderBookError>((next, aggregate))
        })?;
        debug!(
            "board post side={} price={} quantity={} aggregate={}",
            self.side, price, quantity, aggregate
        );
        Ok(aggregate)
    }

    /// Subtracts the order's quantity at its price. Returns the level's remaining aggregate;
    /// zero means the level was removed.
    ///
    /// Fails with [`OrderBookError::InconsistentBoard`] if the level is missing or holds less
    /// than the order's quantity; the board is left unchanged.
    pub fn retract(&self, order: &Order) -> Result<Decimal, OrderBookError> {
        self.check_side(order)?;
        let side = self.side;
        let price = order.price();
        let quantity = order.quantity();
        let remaining = self.levels.update(|current| {
            let Some(&aggregate) = current.get(&price) else {
                return Err(OrderBookError::InconsistentBoard {
                    side,
                    price,
                    reason: "no level at this price".into(),
                });
            };
            let remaining = aggregate - quantity;
            if remaining < Decimal::ZERO {
                return Err(OrderBookError::InconsistentBoard {
                    side,
                    price,
                    reason: format!("retracting {} from aggregate {}", quantity, aggregate),
                });
            }
            let mut next = current.clone();
            if remaining.is_zero() {
                next.remove(&price);
            } else {
                next.insert(price, remaining);
            }
            Ok((next, remaining))
        })?;
        debug!(
            "board retract side={} price={} quantity={} remaining={}",
            self.side, price, quantity, remaining
        );
        Ok(remaining)
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.levels.read(|levels| BoardSnapshot::from_levels(self.side, levels))
    }

    /// Best price on this board, without copying the rest.
    pub fn best_price(&self) -> Option<Decimal> {
        self.levels.read(|levels| match self.side {
            Side::Buy => levels.keys().next_back().copied(),
            Side::Sell => levels.keys().next().copied(),
        })
    }

    pub fn len(&self) -> usize {
        self.levels.read(|levels| levels.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_side(&self, order: &Order) -> Result<(), OrderBookError> {
        if order.side() != self.side {
            return Err(OrderBookError::InvalidSide {
                side: order.side().to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::OrderFactory;
    use rust_decimal_macros::dec;

    fn order(factory: &OrderFactory, side: Side, qty: Decimal, price: Decimal) -> Order {
        factory.make_order("trader", qty, price, side).unwrap()
    }

    #[test]
    fn post_aggregates_same_price() {
        let factory = OrderFactory::default();
        let board = OrderBoard::new(Side::Buy);
        board.post(&order(&factory, Side::Buy, dec!(5.00), dec!(100.0000))).unwrap();
        let agg = board.post(&order(&factory, Side::Buy, dec!(3.00), dec!(100.0000))).unwrap();
        assert_eq!(agg, dec!(8.00));
        assert_eq!(board.snapshot().get(dec!(100)), Some(dec!(8.00)));
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn buy_board_is_descending_sell_board_ascending() {
        let factory = OrderFactory::default();
        let bids = OrderBoard::new(Side::Buy);
        let asks = OrderBoard::new(Side::Sell);
        for p in [dec!(99), dec!(101), dec!(100)] {
            bids.post(&order(&factory, Side::Buy, dec!(1), p)).unwrap();
            asks.post(&order(&factory, Side::Sell, dec!(1), p)).unwrap();
        }
        let bid_prices: Vec<Decimal> = bids.snapshot().iter().map(|e| e.price).collect();
        let ask_prices: Vec<Decimal> = asks.snapshot().iter().map(|e| e.price).collect();
        assert_eq!(bid_prices, vec![dec!(101), dec!(100), dec!(99)]);
        assert_eq!(ask_prices, vec![dec!(99), dec!(100), dec!(101)]);
        assert_eq!(bids.best_price(), Some(dec!(101)));
        assert_eq!(asks.best_price(), Some(dec!(99)));
        assert_eq!(bids.snapshot().depth(2).len(), 2);
        assert_eq!(asks.snapshot().depth(10).len(), 3);
    }

    #[test]
    fn post_past_decimal_range_is_rejected_and_leaves_board() {
        let factory = OrderFactory::default();
        let board = OrderBoard::new(Side::Buy);
        let whale = Decimal::from_i128_with_scale(5 * 10i128.pow(26), 0);
        board.post(&order(&factory, Side::Buy, whale, dec!(1))).unwrap();
        let err = board.post(&order(&factory, Side::Buy, whale, dec!(1))).unwrap_err();
        assert_eq!(
            err,
            OrderBookError::LevelOverflow {
                side: Side::Buy,
                price: dec!(1.0000)
            }
        );
        assert_eq!(board.snapshot().get(dec!(1)), Some(whale));
        // other levels still accept orders
        board.post(&order(&factory, Side::Buy, whale, dec!(2))).unwrap();
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn retract_to_zero_removes_level() {
        let factory = OrderFactory::default();
        let board = OrderBoard::new(Side::Sell);
        let a = order(&factory, Side::Sell, dec!(2), dec!(50));
        let b = order(&factory, Side::Sell, dec!(3), dec!(50));
        board.post(&a).unwrap();
        board.post(&b).unwrap();
        assert_eq!(board.retract(&a).unwrap(), dec!(3));
        assert_eq!(board.retract(&b).unwrap(), Decimal::ZERO);
        assert!(board.is_empty());
        assert!(!board.snapshot().contains_price(dec!(50)));
    }

    #[test]
    fn retract_missing_level_is_inconsistent() {
        let factory = OrderFactory::default();
        let board = OrderBoard::new(Side::Buy);
        let o = order(&factory, Side::Buy, dec!(1), dec!(10));
        let err = board.retract(&o).unwrap_err();
        assert!(matches!(err, OrderBookError::InconsistentBoard { side: Side::Buy, .. }));
    }

    #[test]
    fn retract_more_than_aggregate_is_inconsistent_and_leaves_board() {
        let factory = OrderFactory::default();
        let board = OrderBoard::new(Side::Buy);
        board.post(&order(&factory, Side::Buy, dec!(1), dec!(10))).unwrap();
        let big = order(&factory, Side::Buy, dec!(5), dec!(10));
        let err = board.retract(&big).unwrap_err();
        assert!(matches!(err, OrderBookError::InconsistentBoard { .. }));
        assert_eq!(board.snapshot().get(dec!(10)), Some(dec!(1)));
    }

    #[test]
    fn wrong_side_is_rejected() {
        let factory = OrderFactory::default();
        let board = OrderBoard::new(Side::Buy);
        let sell = order(&factory, Side::Sell, dec!(1), dec!(10));
        assert_eq!(
            board.post(&sell).unwrap_err(),
            OrderBookError::InvalidSide { side: "sell".into() }
        );
        assert!(board.is_empty());
    }

    #[test]
    fn snapshot_is_not_live() {
        let factory = OrderFactory::default();
        let board = OrderBoard::new(Side::Buy);
        board.post(&order(&factory, Side::Buy, dec!(1), dec!(10))).unwrap();
        let snap = board.snapshot();
        board.post(&order(&factory, Side::Buy, dec!(1), dec!(11))).unwrap();
        assert_eq!(snap.len(), 1);
        assert_eq!(board.snapshot().len(), 2);
        assert_eq!(board.snapshot().total_quantity(), dec!(2));
    }

    #[test]
    fn snapshot_serializes_best_first() {
        let factory = OrderFactory::default();
        let board = OrderBoard::new(Side::Buy);
        board.post(&order(&factory, Side::Buy, dec!(1.5), dec!(10))).unwrap();
        board.post(&order(&factory, Side::Buy, dec!(2), dec!(12))).unwrap();
        let json = serde_json::to_value(board.snapshot()).unwrap();
        assert_eq!(json["side"], "buy");
        assert_eq!(json["levels"][0]["price"], "12.0000");
        assert_eq!(json["levels"][1]["aggregate_quantity"], "1.50");
        let map = board.snapshot().into_map();
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![dec!(10), dec!(12)]);
    }
}
