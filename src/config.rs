//! Replay configuration for the demo binary.
//!
//! Only drives the synthetic stream; order scales are fixed in [`crate::factory`].

use log::warn;

pub const SEED_VAR: &str = "ORDER_BOARD_SEED";
pub const ORDERS_VAR: &str = "ORDER_BOARD_ORDERS";
pub const CANCEL_EVERY_VAR: &str = "ORDER_BOARD_CANCEL_EVERY";

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReplayConfig {
    /// Generator seed.
    pub seed: u64,
    /// Number of generated orders to place.
    pub num_orders: usize,
    /// Cancel every n-th placed order; 0 cancels none.
    pub cancel_every: usize,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            num_orders: 100,
            cancel_every: 3,
        }
    }
}

impl ReplayConfig {
    /// Reads settings from the environment; unset or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ReplayConfig::from_env`] with an explicit variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            seed: parse_or(&lookup, SEED_VAR, defaults.seed),
            num_orders: parse_or(&lookup, ORDERS_VAR, defaults.num_orders),
            cancel_every: parse_or(&lookup, CANCEL_EVERY_VAR, defaults.cancel_every),
        }
    }
}

fn parse_or<T: std::str::FromStr + Copy>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring unparsable {}={:?}", key, raw);
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = ReplayConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, ReplayConfig::default());
    }

    #[test]
    fn reads_overrides_and_ignores_garbage() {
        let config = ReplayConfig::from_lookup(lookup_from(&[
            (SEED_VAR, " 42 "),
            (ORDERS_VAR, "many"),
            (CANCEL_EVERY_VAR, "0"),
        ]));
        assert_eq!(config.seed, 42);
        assert_eq!(config.num_orders, ReplayConfig::default().num_orders);
        assert_eq!(config.cancel_every, 0);
    }
}
