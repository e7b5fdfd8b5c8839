//! Binary-heap priority queue with a configurable direction.
//!
//! ## Ordering
//!
//! - [`Direction::Max`]: highest key first (buy side)
//! - [`Direction::Min`]: lowest key first (sell side)
//!
//! `BinaryHeap` does not keep equal keys in insertion order, so every entry
//! carries a sequence number and ties go to the lower one. This gives
//! price-time priority: best price first, then first-in first-matched.
//!
//! ## Payload
//!
//! The queue stores only the arena key of an order (`value`). The order
//! itself lives in the book's slab, so fills mutate it in place and the
//! queue entry stays where it is.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Which end of the key range comes out first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Descending keys (bids)
    Max,
    /// Ascending keys (asks)
    Min,
}

/// A queued item: priority key, arrival sequence and arena key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEntry {
    /// Priority key (the order's fixed-point `price()`)
    pub key: u64,

    /// Insertion sequence, unique within the queue
    pub seq: u64,

    /// Slab key of the order
    pub value: usize,
}

#[derive(Debug, Clone)]
struct HeapEntry {
    entry: QueueEntry,
    direction: Direction,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    // Greater means higher priority (BinaryHeap is a max-heap).
    fn cmp(&self, other: &Self) -> Ordering {
        let by_key = match self.direction {
            Direction::Max => self.entry.key.cmp(&other.entry.key),
            Direction::Min => other.entry.key.cmp(&self.entry.key),
        };
        by_key.then_with(|| other.entry.seq.cmp(&self.entry.seq))
    }
}

/// Priority queue over `(key, value)` pairs.
///
/// ## Example
///
/// ```
/// use market_core::orderbook::{Direction, PriorityQueue};
///
/// let mut bids = PriorityQueue::new(Direction::Max);
/// bids.insert(1_000, 0);
/// bids.insert(1_005, 1);
/// bids.insert(1_005, 2);
///
/// assert_eq!(bids.remove_top().map(|e| e.value), Some(1));
/// assert_eq!(bids.remove_top().map(|e| e.value), Some(2));
/// assert_eq!(bids.remove_top().map(|e| e.key), Some(1_000));
/// assert!(bids.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct PriorityQueue {
    heap: BinaryHeap<HeapEntry>,
    direction: Direction,
    next_seq: u64,
}

impl PriorityQueue {
    /// Create an empty queue
    pub fn new(direction: Direction) -> Self {
        Self {
            heap: BinaryHeap::new(),
            direction,
            next_seq: 0,
        }
    }

    /// Create an empty queue with room for `capacity` entries
    pub fn with_capacity(direction: Direction, capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            direction,
            next_seq: 0,
        }
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Insert `value` with priority `key`. O(log n)
    pub fn insert(&mut self, key: u64, value: usize) -> QueueEntry {
        let entry = QueueEntry {
            key,
            seq: self.next_seq,
            value,
        };
        self.next_seq += 1;
        self.heap.push(HeapEntry {
            entry,
            direction: self.direction,
        });
        entry
    }

    /// Top entry without removing it. O(1)
    #[inline]
    pub fn peek(&self) -> Option<&QueueEntry> {
        self.heap.peek().map(|h| &h.entry)
    }

    /// Remove and return the top entry. O(log n)
    #[inline]
    pub fn remove_top(&mut self) -> Option<QueueEntry> {
        self.heap.pop().map(|h| h.entry)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Drop every entry. The sequence counter keeps running.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// All entries in the order they would be removed. O(n log n)
    pub fn entries(&self) -> Vec<QueueEntry> {
        let mut sorted = self.heap.clone().into_sorted_vec();
        sorted.reverse();
        sorted.into_iter().map(|h| h.entry).collect()
    }

    /// All keys in the order they would be removed
    pub fn keys(&self) -> Vec<u64> {
        self.entries().into_iter().map(|e| e.key).collect()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
