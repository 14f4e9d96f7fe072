//! Demo: replay a synthetic order stream, cancel part of it, print both boards as JSON.
//!
//! Environment: see [`ReplayConfig::from_env`]. Log level via `RUST_LOG`.

use log::info;
use order_board::{every_nth, replay_into_engine, Engine, Generator, GeneratorConfig, ReplayConfig, Side};
use std::process::ExitCode;

fn main() -> ExitCode {
    let _ = env_logger::try_init();
    let ReplayConfig {
        seed,
        num_orders,
        cancel_every,
    } = ReplayConfig::from_env();
    info!(
        "replaying seed={} orders={} cancel_every={}",
        seed, num_orders, cancel_every
    );

    let engine = Engine::new();
    let requests = Generator::new(GeneratorConfig {
        seed,
        num_orders,
        ..Default::default()
    })
    .all_requests();
    let ids = match replay_into_engine(&engine, requests) {
        Ok(ids) => ids,
        Err(e) => {
            eprintln!("replay failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    for id in every_nth(&ids, cancel_every) {
        if let Err(e) = engine.cancel(id) {
            eprintln!("cancel failed: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let out = serde_json::json!({
        "live_orders": engine.len(),
        "best_bid": engine.best_bid(),
        "best_ask": engine.best_ask(),
        "buy": engine.get_board(Side::Buy),
        "sell": engine.get_board(Side::Sell),
    });
    match serde_json::to_string_pretty(&out) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("serialize failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
