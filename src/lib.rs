//! # Order Board
//!
//! In-memory order registry with two price-sorted aggregation boards (one per side).
//! Orders are never matched; each live order contributes its quantity to one price level.
//!
//! ## Entry point
//!
//! Use [`Engine`]: [`Engine::submit`] or [`make_order`] + [`Engine::place`] to add orders,
//! [`Engine::cancel`] to remove them, [`Engine::get_board`] and [`Engine::lookup`] to read.
//!
//! ## Example
//!
//! ```rust
//! use order_board::{Engine, Side};
//! use rust_decimal::Decimal;
//!
//! let engine = Engine::new();
//! let order = engine
//!     .factory()
//!     .make_order("alice", Decimal::new(10005, 3), Decimal::from(100), Side::Buy)
//!     .unwrap();
//! let id = engine.place(order).unwrap();
//! let bids = engine.get_board(Side::Buy);
//! assert_eq!(bids.get(Decimal::from(100)), Some(Decimal::new(1001, 2)));
//! assert!(engine.cancel(id).unwrap());
//! assert!(engine.get_board(Side::Buy).is_empty());
//! ```
//!
//! ## Lower-level API
//!
//! [`OrderRegistry`] and [`OrderBoard`] can be used directly and shared between engines via
//! [`Engine::from_parts`]. Both are built on [`swap::SwapCell`], a lock-free
//! compare-and-swap snapshot cell.

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod factory;
pub mod ids;
pub mod market_data_gen;
pub mod registry;
pub mod swap;
pub mod types;

pub use board::{BoardEntry, BoardSnapshot, OrderBoard};
pub use config::ReplayConfig;
pub use engine::Engine;
pub use error::{OrderBookError, OrderField, ValidationError};
pub use factory::{make_order, round_half_up, OrderFactory, PRICE_SCALE, QUANTITY_SCALE};
pub use ids::IdGenerator;
pub use market_data_gen::{every_nth, replay_into_engine, Generator, GeneratorConfig};
pub use registry::OrderRegistry;
pub use types::{Order, OrderId, OrderRequest, Side};
