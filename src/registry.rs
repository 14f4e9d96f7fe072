//! Order registry: the authoritative id → [`Order`] map of live orders.
//!
//! Each mutation swaps in a whole new map (see [`crate::swap::SwapCell`]). Racing inserts and
//! removals are applied in a single total order, and a given id is removed by exactly one caller.

use log::{debug, warn};
use std::collections::BTreeMap;

use crate::error::OrderBookError;
use crate::swap::SwapCell;
use crate::types::{Order, OrderId};

type OrderMap = BTreeMap<OrderId, Order>;

#[derive(Debug, Default)]
pub struct OrderRegistry {
    orders: SwapCell<OrderMap>,
}

impl OrderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a live order. An id that is already present is rejected and the existing
    /// entry kept.
    pub fn insert(&self, order: Order) -> Result<(), OrderBookError> {
        let order_id = order.id();
        let res = self.orders.update(|current| {
            if current.contains_key(&order_id) {
                return Err(OrderBookError::DuplicateOrder { order_id });
            }
            let mut next = current.clone();
            next.insert(order_id, order.clone());
            Ok((next, ()))
        });
        match &res {
            Ok(()) => debug!("registry insert order_id={}", order_id),
            Err(_) => warn!("registry rejected duplicate order_id={}", order_id),
        }
        res
    }

    /// Removes and returns the order, or `None` if it is not live.
    pub fn remove(&self, order_id: OrderId) -> Option<Order> {
        let removed = self.orders.update(|current| {
            if !current.contains_key(&order_id) {
                return Err(());
            }
            let mut next = current.clone();
            let removed = next.remove(&order_id);
            Ok((next, removed))
        });
        removed.ok().flatten()
    }

    pub fn lookup(&self, order_id: OrderId) -> Option<Order> {
        self.orders.read(|m| m.get(&order_id).cloned())
    }

    pub fn contains(&self, order_id: OrderId) -> bool {
        self.orders.read(|m| m.contains_key(&order_id))
    }

    pub fn len(&self) -> usize {
        self.orders.read(|m| m.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live orders at call time, ascending by id.
    pub fn orders(&self) -> Vec<Order> {
        self.orders.read(|m| m.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::OrderFactory;
    use crate::types::Side;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn insert_lookup_remove() {
        let factory = OrderFactory::default();
        let registry = OrderRegistry::new();
        let order = factory.make_order("alice", dec!(5), dec!(100), Side::Buy).unwrap();
        registry.insert(order.clone()).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup(order.id()), Some(order.clone()));
        assert_eq!(registry.remove(order.id()), Some(order.clone()));
        assert!(registry.lookup(order.id()).is_none());
        assert!(registry.remove(order.id()).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn duplicate_insert_keeps_existing_entry() {
        let factory = OrderFactory::default();
        let registry = OrderRegistry::new();
        let order = factory.make_order("alice", dec!(5), dec!(100), Side::Buy).unwrap();
        registry.insert(order.clone()).unwrap();
        let err = registry.insert(order.clone()).unwrap_err();
        assert_eq!(err, OrderBookError::DuplicateOrder { order_id: order.id() });
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup(order.id()), Some(order));
    }

    #[test]
    fn orders_are_sorted_by_id() {
        let factory = OrderFactory::default();
        let registry = OrderRegistry::new();
        let orders: Vec<Order> = (0..5)
            .map(|i| factory.make_order("u", dec!(1), Decimal::from(100 + i), Side::Sell).unwrap())
            .collect();
        for o in orders.iter().rev() {
            registry.insert(o.clone()).unwrap();
        }
        let ids: Vec<OrderId> = registry.orders().iter().map(Order::id).collect();
        assert_eq!(ids, orders.iter().map(Order::id).collect::<Vec<_>>());
    }
}
