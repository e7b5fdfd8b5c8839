//! Identity index: order identity to slab key.
//!
//! Lets the book find a live order by `actor:created_at` without walking
//! a queue. Entries are added on `add` and removed when an order fills or
//! is dequeued; partially filled orders stay indexed.

use std::collections::HashMap;

/// Map from [`Order::identity`](crate::types::Order::identity) to slab key.
#[derive(Debug, Clone, Default)]
pub struct IdentityIndex {
    keys: HashMap<String, usize>,
}

impl IdentityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: HashMap::with_capacity(capacity),
        }
    }

    /// Register `identity`, returning the key it previously mapped to
    #[inline]
    pub fn put(&mut self, identity: String, key: usize) -> Option<usize> {
        self.keys.insert(identity, key)
    }

    #[inline]
    pub fn get(&self, identity: &str) -> Option<usize> {
        self.keys.get(identity).copied()
    }

    #[inline]
    pub fn remove(&mut self, identity: &str) -> Option<usize> {
        self.keys.remove(identity)
    }

    #[inline]
    pub fn contains(&self, identity: &str) -> bool {
        self.keys.contains_key(identity)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_remove() {
        let mut index = IdentityIndex::with_capacity(4);
        assert!(index.is_empty());

        assert_eq!(index.put("Bob:1".to_string(), 3), None);
        assert_eq!(index.get("Bob:1"), Some(3));
        assert!(index.contains("Bob:1"));
        assert_eq!(index.len(), 1);

        assert_eq!(index.remove("Bob:1"), Some(3));
        assert!(index.get("Bob:1").is_none());
        assert!(index.is_empty());
    }

    #[test]
    fn test_put_replaces() {
        let mut index = IdentityIndex::new();
        index.put("Sam:1".to_string(), 0);
        assert_eq!(index.put("Sam:1".to_string(), 5), Some(0));
        assert_eq!(index.get("Sam:1"), Some(5));
    }

    #[test]
    fn test_remove_missing() {
        let mut index = IdentityIndex::new();
        assert!(index.remove("nobody:0").is_none());
    }

    #[test]
    fn test_clear() {
        let mut index = IdentityIndex::new();
        index.put("a:1".to_string(), 0);
        index.put("b:1".to_string(), 1);
        index.clear();
        assert!(index.is_empty());
    }
}
