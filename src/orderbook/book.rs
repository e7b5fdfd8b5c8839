//! Single-instrument order book and matching loop.
//!
//! ## Architecture
//!
//! - **Slab**: owns every live order, O(1) insert/remove/lookup by key
//! - **Buy queue**: max-priority on `price()`, FIFO among equal prices
//! - **Sell queue**: min-priority on `price()`, FIFO among equal prices
//! - **Identity index**: `actor:created_at` to slab key
//!
//! Queues and index hold only slab keys, so a fill mutates the order once
//! and every structure sees the change.
//!
//! ## Matching
//!
//! [`OrderBook::run`] repeatedly pairs the top buy with the top sell while
//! `buy.price() >= sell.price()`. Each crossing fills
//! `min(buy.shares, sell.shares)` on both sides. A side that reaches zero
//! shares becomes `Filled` and leaves the book; the other becomes `Partial`
//! and stays at the top of its queue.
//!
//! ## Trade handler
//!
//! The registered handler runs synchronously on the matching thread, once
//! per side per crossing, buy side first. A slow handler stalls matching;
//! wrap it in a [`TradeDispatcher`](crate::engine::TradeDispatcher) if it
//! must not block.
//!
//! ## Example
//!
//! ```
//! use market_core::orderbook::OrderBook;
//! use market_core::types::{Intent, Order};
//!
//! let mut book = OrderBook::with_capacity(16);
//! book.add(Order::buy_limit("Bob", 1, 100, 1_005_000_000)).unwrap();
//! book.add(Order::sell_market("Sam", 1, 40)).unwrap();
//! book.run();
//!
//! let bob = book.peek(Intent::Buy).unwrap();
//! assert_eq!(bob.shares(), 60);
//! assert!(book.peek(Intent::Sell).is_none());
//! ```

use std::fmt;

use sha2::{Digest, Sha256};
use slab::Slab;
use tracing::{debug, trace, warn};

use crate::config::BookConfig;
use crate::error::OrderError;
use crate::orderbook::{Direction, IdentityIndex, PriorityQueue};
use crate::types::{Intent, Order, OrderState};

/// Callback fired for every order that takes part in a fill.
pub type TradeHandler = Box<dyn FnMut(&Order) + Send>;

/// Order book for one instrument.
pub struct OrderBook {
    /// Live orders, keyed by slab index
    orders: Slab<Order>,

    /// Bids, best (highest) first
    buy_queue: PriorityQueue,

    /// Asks, best (lowest) first
    sell_queue: PriorityQueue,

    /// Identity to slab key, for every live order
    index: IdentityIndex,

    trade_handler: Option<TradeHandler>,

    /// Crossings executed since creation
    match_count: u64,
}

impl fmt::Debug for OrderBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderBook")
            .field("orders", &self.orders.len())
            .field("buy_queue", &self.buy_queue.len())
            .field("sell_queue", &self.sell_queue.len())
            .field("trade_handler", &self.trade_handler.is_some())
            .field("match_count", &self.match_count)
            .finish()
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    /// Create an empty book
    pub fn new() -> Self {
        Self {
            orders: Slab::new(),
            buy_queue: PriorityQueue::new(Direction::Max),
            sell_queue: PriorityQueue::new(Direction::Min),
            index: IdentityIndex::new(),
            trade_handler: None,
            match_count: 0,
        }
    }

    /// Create an empty book with room for `capacity` orders
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            orders: Slab::with_capacity(capacity),
            buy_queue: PriorityQueue::with_capacity(Direction::Max, capacity),
            sell_queue: PriorityQueue::with_capacity(Direction::Min, capacity),
            index: IdentityIndex::with_capacity(capacity),
            trade_handler: None,
            match_count: 0,
        }
    }

    pub fn from_config(config: &BookConfig) -> Self {
        Self::with_capacity(config.capacity)
    }

    // ========================================================================
    // Size
    // ========================================================================

    /// Number of live orders on both sides
    #[inline]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    #[inline]
    pub fn buy_len(&self) -> usize {
        self.buy_queue.len()
    }

    #[inline]
    pub fn sell_len(&self) -> usize {
        self.sell_queue.len()
    }

    /// Crossings executed since the book was created
    #[inline]
    pub fn match_count(&self) -> u64 {
        self.match_count
    }

    // ========================================================================
    // Order Management
    // ========================================================================

    /// Place an order on its side of the book.
    ///
    /// The order is validated first; a rejected order leaves the book
    /// unchanged. An identity already held by a live order is refused with
    /// [`OrderError::DuplicateIdentity`]. Matching does not happen here,
    /// call [`run`](Self::run).
    pub fn add(&mut self, order: Order) -> Result<(), OrderError> {
        if let Err(reason) = order.validate() {
            warn!(identity = %order.identity(), %reason, "rejected order");
            return Err(reason.into());
        }

        let identity = order.identity();
        if self.index.contains(&identity) {
            warn!(%identity, "rejected duplicate order");
            return Err(OrderError::DuplicateIdentity { identity });
        }

        let price = order.price();
        let intent = order.intent();
        let shares = order.shares();
        let variant = order.variant_name();

        let key = self.orders.insert(order);
        let entry = self.queue_mut(intent).insert(price, key);
        self.index.put(identity.clone(), key);

        debug!(%identity, variant, price, shares, seq = entry.seq, "order added");
        Ok(())
    }

    /// Register the trade handler, replacing any previous one.
    pub fn set_trade_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&Order) + Send + 'static,
    {
        self.trade_handler = Some(Box::new(handler));
    }

    pub fn clear_trade_handler(&mut self) {
        self.trade_handler = None;
    }

    /// Match crossing orders until the book no longer crosses.
    ///
    /// Terminates with the best bid below the best ask, or with one side
    /// empty. A no-op on an empty or non-crossing book.
    pub fn run(&mut self) {
        while let Some((buy_key, sell_key)) = self.crossing() {
            let buy_shares = self.order(buy_key).shares();
            let sell_shares = self.order(sell_key).shares();
            let quantity = buy_shares.min(sell_shares);

            self.match_count += 1;
            debug!(
                buy = %self.order(buy_key).identity(),
                sell = %self.order(sell_key).identity(),
                quantity,
                "crossing"
            );

            self.settle(Intent::Buy, buy_key, quantity);
            self.settle(Intent::Sell, sell_key, quantity);
        }
    }

    /// Slab keys of the two top orders if they cross
    fn crossing(&self) -> Option<(usize, usize)> {
        let buy = self.buy_queue.peek()?;
        let sell = self.sell_queue.peek()?;
        (buy.key >= sell.key).then_some((buy.value, sell.value))
    }

    /// Apply a fill to the top order of `intent` and notify the handler.
    fn settle(&mut self, intent: Intent, key: usize, quantity: u64) {
        let remaining = self
            .orders
            .get_mut(key)
            .expect("queued order missing from arena")
            .fill(quantity);

        if remaining > 0 {
            trace!(key, remaining, "partial fill");
            if let Some(handler) = self.trade_handler.as_mut() {
                handler(&self.orders[key]);
            }
            return;
        }

        let top = self.queue_mut(intent).remove_top();
        assert_eq!(
            top.map(|entry| entry.value),
            Some(key),
            "filled order is not at the top of its queue"
        );

        let order = self.orders.remove(key);
        let indexed = self.index.remove(&order.identity());
        assert_eq!(indexed, Some(key), "filled order missing from identity index");

        trace!(key, identity = %order.identity(), "filled");
        if let Some(handler) = self.trade_handler.as_mut() {
            handler(&order);
        }
    }

    /// Remove and return the top order of one side.
    ///
    /// Queue, index and arena are updated together, so the book stays
    /// consistent. The order keeps its current state and shares.
    pub fn dequeue(&mut self, intent: Intent) -> Option<Order> {
        let entry = self.queue_mut(intent).remove_top()?;
        let order = self.orders.remove(entry.value);
        let indexed = self.index.remove(&order.identity());
        assert_eq!(indexed, Some(entry.value), "dequeued order missing from identity index");
        Some(order)
    }

    /// Drop every order. The trade handler stays registered.
    pub fn clear(&mut self) {
        self.orders.clear();
        self.buy_queue.clear();
        self.sell_queue.clear();
        self.index.clear();
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Top order of one side
    pub fn peek(&self, intent: Intent) -> Option<&Order> {
        let entry = self.queue(intent).peek()?;
        self.orders.get(entry.value)
    }

    /// Priority key of the top order of one side
    #[inline]
    pub fn best_price(&self, intent: Intent) -> Option<u64> {
        self.queue(intent).peek().map(|entry| entry.key)
    }

    /// Priority keys of one side in matching order
    pub fn prices(&self, intent: Intent) -> Vec<u64> {
        self.queue(intent).keys()
    }

    /// Orders of one side in matching order
    pub fn orders(&self, intent: Intent) -> Vec<&Order> {
        self.queue(intent)
            .entries()
            .into_iter()
            .map(|entry| self.order(entry.value))
            .collect()
    }

    /// Live order by identity
    pub fn get(&self, identity: &str) -> Option<&Order> {
        let key = self.index.get(identity)?;
        self.orders.get(key)
    }

    #[inline]
    pub fn contains(&self, identity: &str) -> bool {
        self.index.contains(identity)
    }

    /// SHA-256 over the resting orders of both sides in matching order.
    ///
    /// Books fed the same sequence of `add`/`run` calls produce the same
    /// root.
    pub fn state_root(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();

        for intent in [Intent::Buy, Intent::Sell] {
            hasher.update([intent as u8]);
            for order in self.orders(intent) {
                hasher.update(order.identity().as_bytes());
                hasher.update([0u8]);
                hasher.update(order.price().to_le_bytes());
                hasher.update(order.shares().to_le_bytes());
                hasher.update([state_tag(order.state())]);
            }
        }

        let mut root = [0u8; 32];
        root.copy_from_slice(&hasher.finalize());
        root
    }

    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    #[inline]
    fn queue(&self, intent: Intent) -> &PriorityQueue {
        match intent {
            Intent::Buy => &self.buy_queue,
            Intent::Sell => &self.sell_queue,
        }
    }

    #[inline]
    fn queue_mut(&mut self, intent: Intent) -> &mut PriorityQueue {
        match intent {
            Intent::Buy => &mut self.buy_queue,
            Intent::Sell => &mut self.sell_queue,
        }
    }

    #[inline]
    fn order(&self, key: usize) -> &Order {
        self.orders.get(key).expect("queued order missing from arena")
    }
}

fn state_tag(state: OrderState) -> u8 {
    match state {
        OrderState::Open => 0,
        OrderState::Partial => 1,
        OrderState::Filled => 2,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
