//! Synthetic order flow generator.
//!
//! Deterministic, configurable stream of [`OrderRequest`]s for replay tests, demos and
//! benchmarks. Same config ⇒ same sequence. Quantities carry three fractional digits, one
//! more than the default quantity scale, so the factory's rounding is always exercised.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use crate::engine::Engine;
use crate::error::OrderBookError;
use crate::types::{OrderId, OrderRequest, Side};

/// Configuration for the synthetic order generator. All ranges are inclusive.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// RNG seed. Same seed ⇒ same stream.
    pub seed: u64,
    /// Number of requests produced by [`Generator::all_requests`].
    pub num_orders: usize,
    /// Probability of Buy (0.0..=1.0). Sell otherwise.
    pub buy_ratio: f64,
    /// Price range in whole units.
    pub price_min: i64,
    pub price_max: i64,
    /// Number of price ticks per unit; 4 gives quarter steps (100.00, 100.25, ...).
    pub ticks_per_unit: i64,
    /// Quantity range in thousandths (so 1500 is 1.500 before rounding). Values below 5
    /// round to zero at scale 2 and are rejected by the factory.
    pub quantity_min_milli: i64,
    pub quantity_max_milli: i64,
    /// Users are named `user-1..=user-N`.
    pub num_users: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            num_orders: 1000,
            buy_ratio: 0.5,
            price_min: 95,
            price_max: 105,
            ticks_per_unit: 4,
            quantity_min_milli: 10,
            quantity_max_milli: 100_000,
            num_users: 5,
        }
    }
}

/// Deterministic request stream. Create with [`Generator::new`].
pub struct Generator {
    rng: StdRng,
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { rng, config }
    }

    pub fn next_request(&mut self) -> OrderRequest {
        let side = if self.rng.gen::<f64>() < self.config.buy_ratio {
            Side::Buy
        } else {
            Side::Sell
        };
        let ticks = self.config.ticks_per_unit.max(1);
        let lo = self.config.price_min * ticks;
        let hi = (self.config.price_max * ticks).max(lo);
        let price = Decimal::from(self.rng.gen_range(lo..=hi)) / Decimal::from(ticks);
        let price = price.max(Decimal::ONE);
        let qty_lo = self.config.quantity_min_milli.max(1);
        let qty_hi = self.config.quantity_max_milli.max(qty_lo);
        let quantity = Decimal::new(self.rng.gen_range(qty_lo..=qty_hi), 3);
        let user = format!("user-{}", self.rng.gen_range(1..=self.config.num_users.max(1)));
        OrderRequest::new(user, quantity, price, side)
    }

    pub fn take_requests(&mut self, n: usize) -> Vec<OrderRequest> {
        (0..n).map(|_| self.next_request()).collect()
    }

    /// The full stream as defined by `num_orders`.
    pub fn all_requests(&mut self) -> Vec<OrderRequest> {
        self.take_requests(self.config.num_orders)
    }
}

/// Submits every request in order. Returns the ids placed, or the first error.
pub fn replay_into_engine(
    engine: &Engine,
    requests: impl IntoIterator<Item = OrderRequest>,
) -> Result<Vec<OrderId>, OrderBookError> {
    requests
        .into_iter()
        .map(|req| engine.submit_request(&req))
        .collect()
}

/// Every `step`-th id (1-based: the `step`th, `2*step`th, ...). `step == 0` selects nothing.
pub fn every_nth(ids: &[OrderId], step: usize) -> Vec<OrderId> {
    if step == 0 {
        return Vec::new();
    }
    ids.iter().skip(step - 1).step_by(step).copied().collect()
}
