//! Binary min-heap with an index side table for decrease-key.
//!
//! Entries are `(key, cost)` pairs stored in a `Vec` using 0-indexed heap
//! layout (parent = (i-1)/2, children = 2i+1, 2i+2). The side table maps each
//! queued key to its slot so that `contains` and `decrease_key` never scan.
//! Every element move goes through `swap`, which keeps the table in step.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::error::QueueError;

#[derive(Debug, Clone)]
struct Entry<K, C> {
    key: K,
    cost: C,
}

/// Min-priority queue keyed by `K` with decrease-key support.
#[derive(Debug, Clone)]
pub struct DecreaseKeyQueue<K, C> {
    heap: Vec<Entry<K, C>>,
    index: FxHashMap<K, usize>,
}

impl<K, C> DecreaseKeyQueue<K, C>
where
    K: Eq + Hash + Clone,
    C: Ord + Copy,
{
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Add a new entry. Fails if `key` is already queued.
    pub fn insert(&mut self, key: K, cost: C) -> Result<(), QueueError> {
        if self.index.contains_key(&key) {
            return Err(QueueError::DuplicateKey);
        }
        let slot = self.heap.len();
        self.index.insert(key.clone(), slot);
        self.heap.push(Entry { key, cost });
        self.sift_up(slot);
        Ok(())
    }

    /// Remove and return the cheapest entry. Ties are broken arbitrarily.
    pub fn extract_min(&mut self) -> Result<(K, C), QueueError> {
        if self.heap.is_empty() {
            return Err(QueueError::EmptyQueue);
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let entry = self.heap.pop().ok_or(QueueError::EmptyQueue)?;
        self.index.remove(&entry.key);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Ok((entry.key, entry.cost))
    }

    /// Cheapest entry without removing it.
    pub fn peek(&self) -> Option<(&K, C)> {
        self.heap.first().map(|e| (&e.key, e.cost))
    }

    /// Lower the cost of a queued key.
    ///
    /// Returns `true` if the entry changed. Absent keys and costs that are not
    /// strictly lower leave the queue untouched.
    pub fn decrease_key(&mut self, key: &K, cost: C) -> bool {
        let slot = match self.index.get(key) {
            Some(&slot) => slot,
            None => return false,
        };
        if cost >= self.heap[slot].cost {
            return false;
        }
        self.heap[slot].cost = cost;
        self.sift_up(slot);
        true
    }

    /// Current cost of `key`, if queued.
    pub fn contains(&self, key: &K) -> Option<C> {
        self.index.get(key).map(|&slot| self.heap[slot].cost)
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        if let Some(slot) = self.index.get_mut(&self.heap[a].key) {
            *slot = a;
        }
        if let Some(slot) = self.index.get_mut(&self.heap[b].key) {
            *slot = b;
        }
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.heap[slot].cost < self.heap[parent].cost {
                self.swap(slot, parent);
                slot = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;

            if left < len && self.heap[left].cost < self.heap[smallest].cost {
                smallest = left;
            }
            if right < len && self.heap[right].cost < self.heap[smallest].cost {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap(slot, smallest);
            slot = smallest;
        }
    }
}

impl<K, C> Default for DecreaseKeyQueue<K, C>
where
    K: Eq + Hash + Clone,
    C: Ord + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Heap order holds and the side table points at every entry's real slot.
    fn assert_consistent<K: Eq + Hash + Clone + std::fmt::Debug>(q: &DecreaseKeyQueue<K, u32>) {
        assert_eq!(q.heap.len(), q.index.len());
        for (slot, entry) in q.heap.iter().enumerate() {
            assert_eq!(q.index.get(&entry.key), Some(&slot), "stale index for {:?}", entry.key);
            if slot > 0 {
                let parent = (slot - 1) / 2;
                assert!(q.heap[parent].cost <= entry.cost, "heap order broken at slot {}", slot);
            }
        }
    }

    #[test]
    fn test_empty_queue() {
        let mut q: DecreaseKeyQueue<&str, u32> = DecreaseKeyQueue::new();
        assert!(q.is_empty());
        assert_eq!(q.len(), 0);
        assert_eq!(q.extract_min(), Err(QueueError::EmptyQueue));
        assert!(q.peek().is_none());
    }

    #[test]
    fn test_extracts_in_cost_order() {
        let mut q = DecreaseKeyQueue::new();
        q.insert("hi", 5).unwrap();
        q.insert("hello", 2).unwrap();
        q.insert("goodbye", 1).unwrap();

        assert_eq!(q.extract_min(), Ok(("goodbye", 1)));
        assert_eq!(q.extract_min(), Ok(("hello", 2)));
        assert_eq!(q.extract_min(), Ok(("hi", 5)));
        assert!(q.is_empty());
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut q = DecreaseKeyQueue::new();
        q.insert("a", 3).unwrap();
        assert_eq!(q.insert("a", 1), Err(QueueError::DuplicateKey));
        assert_eq!(q.contains(&"a"), Some(3));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_decrease_key_reorders() {
        let mut q = DecreaseKeyQueue::new();
        q.insert("hi", 5).unwrap();
        q.insert("hello", 2).unwrap();
        q.insert("goodbye", 1).unwrap();

        assert!(q.decrease_key(&"hi", 0));
        assert_eq!(q.contains(&"hi"), Some(0));
        assert_consistent(&q);
        assert_eq!(q.extract_min(), Ok(("hi", 0)));
        assert_eq!(q.extract_min(), Ok(("goodbye", 1)));
    }

    #[test]
    fn test_decrease_key_ignores_non_improvement() {
        let mut q = DecreaseKeyQueue::new();
        for (key, cost) in [("a", 4), ("b", 7), ("c", 1), ("d", 9)] {
            q.insert(key, cost).unwrap();
        }
        let before: Vec<_> = q.heap.iter().map(|e| (e.key, e.cost)).collect();

        assert!(!q.decrease_key(&"b", 7));
        assert!(!q.decrease_key(&"b", 100));
        assert!(!q.decrease_key(&"missing", 0));

        let after: Vec<_> = q.heap.iter().map(|e| (e.key, e.cost)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_contains_tracks_removal() {
        let mut q = DecreaseKeyQueue::new();
        q.insert(1u8, 10).unwrap();
        q.insert(2u8, 20).unwrap();
        assert_eq!(q.contains(&1), Some(10));
        q.extract_min().unwrap();
        assert_eq!(q.contains(&1), None);
        assert_eq!(q.contains(&2), Some(20));
    }

    #[test]
    fn test_random_operations_keep_invariants() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut q: DecreaseKeyQueue<u32, u32> = DecreaseKeyQueue::with_capacity(64);
        let mut next_key = 0u32;
        let mut last_extracted = 0u32;

        for _ in 0..2000 {
            match rng.gen_range(0..3) {
                0 => {
                    // costs never drop below what was already extracted,
                    // as in Dijkstra relaxation
                    let cost = last_extracted + rng.gen_range(0..100);
                    q.insert(next_key, cost).unwrap();
                    next_key += 1;
                }
                1 if !q.is_empty() => {
                    let key = rng.gen_range(0..next_key);
                    if let Some(current) = q.contains(&key) {
                        let lowered = last_extracted + (current - last_extracted) / 2;
                        q.decrease_key(&key, lowered);
                    }
                }
                _ => {
                    if let Ok((_, cost)) = q.extract_min() {
                        assert!(cost >= last_extracted, "extraction went backwards");
                        last_extracted = cost;
                    }
                }
            }
            assert_consistent(&q);
        }

        while let Ok((_, cost)) = q.extract_min() {
            assert!(cost >= last_extracted);
            last_extracted = cost;
        }
    }
}
