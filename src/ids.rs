//! Lock-free order id generator.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use crate::types::OrderId;

static GLOBAL: OnceLock<Arc<IdGenerator>> = OnceLock::new();

/// Monotonic id counter. Every [`IdGenerator::next_id`] returns a value strictly greater than
/// any value previously returned by the same generator, from any thread.
#[derive(Debug)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    /// Isolated generator whose first id is 1.
    pub const fn new() -> Self {
        Self::starting_at(1)
    }

    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// The process-wide generator used by [`crate::make_order`].
    pub fn global() -> Arc<IdGenerator> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(IdGenerator::new())))
    }

    pub fn next_id(&self) -> OrderId {
        OrderId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// The id the next call would return. Racy under contention; for diagnostics only.
    pub fn peek(&self) -> OrderId {
        OrderId(self.next.load(Ordering::Relaxed))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
