//! Bounded LRU memo for operator applications.
//!
//! Recency is tracked with stamps: every touch pushes `(key, stamp)` onto a
//! queue and records the stamp on the entry. Eviction pops from the front and
//! skips queue records whose stamp is stale.

use std::collections::{HashMap, VecDeque};

use crate::grammar::Operator;

/// Operator plus the bit patterns of its arguments.
///
/// Unary applications leave the second slot at zero; the operator alone
/// already distinguishes them from binary ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperatorKey {
    op: Operator,
    args: [u64; 2],
}

impl OperatorKey {
    pub fn unary(op: Operator, x: f64) -> Self {
        Self {
            op,
            args: [x.to_bits(), 0],
        }
    }

    pub fn binary(op: Operator, a: f64, b: f64) -> Self {
        Self {
            op,
            args: [a.to_bits(), b.to_bits()],
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    value: f64,
    stamp: u64,
}

/// LRU cache of operator results.
///
/// A capacity of zero disables memoization entirely.
#[derive(Debug, Clone)]
pub struct OperatorCache {
    map: HashMap<OperatorKey, Entry>,
    order: VecDeque<(OperatorKey, u64)>,
    capacity: usize,
    counter: u64,
    hits: u64,
    misses: u64,
}

impl OperatorCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity.min(4096)),
            order: VecDeque::new(),
            capacity,
            counter: 0,
            hits: 0,
            misses: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Returns the cached value, or computes, stores and returns it.
    pub fn get_or_insert_with(
        &mut self,
        key: OperatorKey,
        compute: impl FnOnce() -> f64,
    ) -> f64 {
        if self.capacity == 0 {
            return compute();
        }
        if let Some(value) = self.get(&key) {
            self.hits += 1;
            return value;
        }
        self.misses += 1;
        let value = compute();
        self.insert(key, value);
        value
    }

    fn get(&mut self, key: &OperatorKey) -> Option<f64> {
        let stamp = self.next_stamp();
        let entry = self.map.get_mut(key)?;
        entry.stamp = stamp;
        self.order.push_back((*key, stamp));
        let value = entry.value;
        self.compact();
        Some(value)
    }

    fn insert(&mut self, key: OperatorKey, value: f64) {
        let stamp = self.next_stamp();
        self.map.insert(key, Entry { value, stamp });
        self.order.push_back((key, stamp));
        self.evict();
    }

    fn evict(&mut self) {
        while self.map.len() > self.capacity {
            let Some((key, stamp)) = self.order.pop_front() else {
                break;
            };
            if self.map.get(&key).is_some_and(|e| e.stamp == stamp) {
                self.map.remove(&key);
            }
        }
        self.compact();
    }

    /// Drops stale queue records once they outnumber live entries.
    fn compact(&mut self) {
        if self.order.len() <= self.capacity.max(16).saturating_mul(4) {
            return;
        }
        let map = &self.map;
        self.order
            .retain(|(key, stamp)| map.get(key).is_some_and(|e| e.stamp == *stamp));
    }

    fn next_stamp(&mut self) -> u64 {
        let stamp = self.counter;
        self.counter = self.counter.wrapping_add(1);
        stamp
    }
}

impl Default for OperatorCache {
    fn default() -> Self {
        Self::new(1024)
    }
}
