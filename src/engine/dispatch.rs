//! Bounded off-thread delivery of trade notifications.
//!
//! The book calls its trade handler on the matching thread. When the real
//! consumer may block (network, disk), put a [`TradeDispatcher`] in between:
//! the book-side handler only clones the order into a bounded queue, and a
//! worker thread feeds the consumer. Matching stalls only while the queue
//! is full.

use std::thread::{self, JoinHandle};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::BookConfig;
use crate::error::EngineError;
use crate::orderbook::TradeHandler;
use crate::types::Order;

/// Worker thread draining a bounded queue of filled/partially filled orders.
///
/// ## Example
///
/// ```
/// use std::sync::mpsc;
/// use market_core::engine::TradeDispatcher;
/// use market_core::orderbook::OrderBook;
/// use market_core::types::Order;
///
/// let (tx, rx) = mpsc::channel();
/// let dispatcher = TradeDispatcher::spawn(8, move |order: Order| {
///     tx.send(order.identity()).unwrap();
/// }).unwrap();
///
/// let mut book = OrderBook::new();
/// book.set_trade_handler(dispatcher.trade_handler());
/// book.add(Order::buy_market("Tim", 1, 100)).unwrap();
/// book.add(Order::sell_market("Sam", 1, 100)).unwrap();
/// book.run();
/// drop(book);
///
/// assert_eq!(dispatcher.join().unwrap(), 2);
/// assert_eq!(rx.iter().collect::<Vec<_>>(), vec!["Tim:1", "Sam:1"]);
/// ```
pub struct TradeDispatcher {
    sender: mpsc::Sender<Order>,
    worker: JoinHandle<u64>,
}

impl TradeDispatcher {
    /// Start the worker with a queue bounded to `capacity` notifications.
    pub fn spawn<F>(capacity: usize, mut handler: F) -> Result<Self, EngineError>
    where
        F: FnMut(Order) + Send + 'static,
    {
        if capacity == 0 {
            return Err(EngineError::Spawn("dispatch capacity must be non-zero".to_string()));
        }

        let (sender, mut receiver) = mpsc::channel::<Order>(capacity);
        let worker = thread::Builder::new()
            .name("trade-dispatch".to_string())
            .spawn(move || {
                let mut delivered = 0u64;
                while let Some(order) = receiver.blocking_recv() {
                    handler(order);
                    delivered += 1;
                }
                debug!(delivered, "trade dispatcher drained");
                delivered
            })
            .map_err(|e| EngineError::Spawn(e.to_string()))?;

        Ok(Self { sender, worker })
    }

    /// Start the worker with the queue bound taken from
    /// [`BookConfig::dispatch_capacity`].
    pub fn from_config<F>(config: &BookConfig, handler: F) -> Result<Self, EngineError>
    where
        F: FnMut(Order) + Send + 'static,
    {
        Self::spawn(config.dispatch_capacity, handler)
    }

    /// Maximum number of notifications the queue holds
    #[inline]
    pub fn max_capacity(&self) -> usize {
        self.sender.max_capacity()
    }

    /// Handler to register on an [`OrderBook`](crate::orderbook::OrderBook).
    ///
    /// Blocks the caller while the queue is full. Must not be called from
    /// inside an async runtime.
    pub fn trade_handler(&self) -> TradeHandler {
        let sender = self.sender.clone();
        Box::new(move |order: &Order| {
            if sender.blocking_send(order.clone()).is_err() {
                warn!(identity = %order.identity(), "trade dispatcher closed, notification dropped");
            }
        })
    }

    /// Close the queue and wait for the worker to drain it.
    ///
    /// Returns the number of notifications delivered. Every handler obtained
    /// from [`trade_handler`](Self::trade_handler) must be dropped first, or
    /// this waits for them.
    pub fn join(self) -> Result<u64, EngineError> {
        let Self { sender, worker } = self;
        drop(sender);
        worker.join().map_err(|_| EngineError::Stopped)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::orderbook::OrderBook;
    use crate::types::OrderState;

    #[test]
    fn test_zero_capacity_rejected() {
        let result = TradeDispatcher::spawn(0, |_: Order| {});
        assert!(matches!(result, Err(EngineError::Spawn(_))));
    }

    #[test]
    fn test_delivers_in_fill_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let dispatcher = TradeDispatcher::spawn(1, move |order: Order| {
            sink.lock().unwrap().push((order.identity(), order.state()));
        })
        .unwrap();

        let mut book = OrderBook::new();
        book.set_trade_handler(dispatcher.trade_handler());
        book.add(Order::buy_limit("Bob", 1, 100, 1_005_000_000)).unwrap();
        book.add(Order::sell_market("Terry", 1, 30)).unwrap();
        book.add(Order::sell_market("Sam", 1, 70)).unwrap();
        book.run();
        drop(book);

        assert_eq!(dispatcher.join().unwrap(), 4);
        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                ("Bob:1".to_string(), OrderState::Partial),
                ("Terry:1".to_string(), OrderState::Filled),
                ("Bob:1".to_string(), OrderState::Filled),
                ("Sam:1".to_string(), OrderState::Filled),
            ]
        );
    }

    #[test]
    fn test_from_config_bounds_queue() {
        let config = BookConfig {
            dispatch_capacity: 1,
            ..BookConfig::default()
        };
        let dispatcher = TradeDispatcher::from_config(&config, |_: Order| {}).unwrap();
        assert_eq!(dispatcher.max_capacity(), 1);
        assert_eq!(dispatcher.join().unwrap(), 0);

        let dispatcher = TradeDispatcher::from_config(&BookConfig::default(), |_: Order| {}).unwrap();
        assert_eq!(dispatcher.max_capacity(), 1024);
        dispatcher.join().unwrap();
    }

    #[test]
    fn test_from_config_rejects_zero_capacity() {
        let config = BookConfig {
            dispatch_capacity: 0,
            ..BookConfig::default()
        };
        let result = TradeDispatcher::from_config(&config, |_: Order| {});
        assert!(matches!(result, Err(EngineError::Spawn(_))));
    }

    #[test]
    fn test_join_without_traffic() {
        let dispatcher = TradeDispatcher::spawn(4, |_: Order| {}).unwrap();
        assert_eq!(dispatcher.join().unwrap(), 0);
    }
}
