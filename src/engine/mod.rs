//! Threading around the order book.
//!
//! ## Design Principles
//!
//! The book itself is synchronous and unsynchronized. This module adds:
//!
//! 1. **Single writer**: [`BookService`] owns the book on one thread;
//!    [`BookHandle`]s serialize `add`/`run`/handler registration through a
//!    command channel
//! 2. **Bounded notifications**: [`TradeDispatcher`] moves a slow trade
//!    consumer off the matching thread behind a bounded queue
//!
//! Both use `tokio::sync` channels from plain OS threads; no async runtime
//! is started.

pub mod dispatch;
pub mod service;

pub use dispatch::TradeDispatcher;
pub use service::{BookHandle, BookService};
