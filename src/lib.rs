//! # Market Core
//!
//! Matching core of a securities exchange simulator: accepts buy and sell
//! orders (limit and market), keeps them in price-time priority queues, and
//! matches crossing orders on demand.
//!
//! ## Architecture
//!
//! - **Types**: the closed `Order` variant set and fixed-point prices
//! - **OrderBook**: slab arena, buy/sell priority queues, identity index,
//!   matching loop and trade handler
//! - **Engine**: single-writer matcher thread and bounded trade dispatch
//!
//! ## Design Principles
//!
//! 1. **Determinism**: the same `add`/`run` sequence yields the same book
//! 2. **No Floating Point**: prices are `u64` scaled by 10^8
//! 3. **Arena Ownership**: queues and index refer to orders by slab key
//! 4. **Synchronous Matching**: `run` completes before returning
//!
//! ## Example
//!
//! ```
//! use market_core::{Intent, Order, OrderBook};
//! use market_core::types::price::to_fixed;
//!
//! let mut book = OrderBook::new();
//! book.add(Order::buy_limit("Bob", 1, 100, to_fixed("10.05").unwrap())).unwrap();
//! book.add(Order::sell_limit("Larry", 1, 100, to_fixed("10.10").unwrap())).unwrap();
//! book.run();
//!
//! // 10.05 < 10.10: nothing crosses
//! assert_eq!(book.len(), 2);
//! ```

/// Book configuration
pub mod config;

/// Error types
pub mod error;

/// Core data types: Order, BaseOrder, Intent, OrderState, prices
pub mod types;

/// Order book: priority queues, identity index, matching
pub mod orderbook;

/// Matcher thread and trade dispatch
pub mod engine;

pub use config::BookConfig;
pub use engine::{BookHandle, BookService, TradeDispatcher};
pub use error::{ConfigError, EngineError, InvalidOrder, OrderError};
pub use orderbook::{OrderBook, PriorityQueue};
pub use types::{BaseOrder, Intent, Order, OrderKind, OrderState};
