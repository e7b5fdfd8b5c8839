//! Order book module for the matching core.
//!
//! ## Components
//!
//! - [`PriorityQueue`]: binary heap of `(price, seq, slab key)`, max or min
//! - [`IdentityIndex`]: order identity to slab key
//! - [`OrderBook`]: slab arena, one queue per side, the index, and the
//!   matching loop
//!
//! ## Performance
//!
//! | Operation        | Complexity   |
//! |------------------|--------------|
//! | Add order        | O(log n)     |
//! | Best bid/ask     | O(1)         |
//! | Lookup by identity | O(1)       |
//! | One crossing     | O(log n)     |
//!
//! ## Example
//!
//! ```
//! use market_core::orderbook::OrderBook;
//! use market_core::types::{Intent, Order};
//! use market_core::types::price::MARKET_BUY_PRICE;
//!
//! let mut book = OrderBook::new();
//! book.add(Order::buy_limit("Bob", 1, 100, 1_005_000_000)).unwrap();
//! book.add(Order::buy_market("Tim", 1, 100)).unwrap();
//!
//! assert_eq!(book.best_price(Intent::Buy), Some(MARKET_BUY_PRICE));
//! ```

pub mod book;
pub mod index;
pub mod queue;

pub use book::{OrderBook, TradeHandler};
pub use index::IdentityIndex;
pub use queue::{Direction, PriorityQueue, QueueEntry};
