//! Short-term tabu memory.
//!
//! A FIFO queue of solution signatures with a count map for O(1) membership.
//! The queue never holds more than `tenure` entries; the oldest is evicted
//! first.

use std::collections::{HashMap, VecDeque};
use std::hash::{DefaultHasher, Hash, Hasher};

use crate::models::OperationId;

/// Bounded FIFO of recently adopted solutions.
#[derive(Debug, Clone)]
pub struct TabuList {
    tenure: usize,
    queue: VecDeque<u64>,
    counts: HashMap<u64, usize>,
}

impl TabuList {
    /// Creates an empty list holding at most `tenure` entries.
    pub fn new(tenure: usize) -> Self {
        Self {
            tenure,
            queue: VecDeque::with_capacity(tenure + 1),
            counts: HashMap::with_capacity(tenure + 1),
        }
    }

    /// Signature of an operation order.
    pub fn signature(genes: &[OperationId]) -> u64 {
        let mut hasher = DefaultHasher::new();
        genes.hash(&mut hasher);
        hasher.finish()
    }

    /// Records a signature, evicting the oldest entries past the tenure.
    pub fn push(&mut self, signature: u64) {
        self.queue.push_back(signature);
        *self.counts.entry(signature).or_insert(0) += 1;

        while self.queue.len() > self.tenure {
            let Some(oldest) = self.queue.pop_front() else {
                break;
            };
            if let Some(count) = self.counts.get_mut(&oldest) {
                *count -= 1;
                if *count == 0 {
                    self.counts.remove(&oldest);
                }
            }
        }
    }

    /// Whether `signature` is currently tabu.
    #[inline]
    pub fn contains(&self, signature: u64) -> bool {
        self.counts.contains_key(&signature)
    }

    /// Number of remembered entries (duplicates included).
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is remembered.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Maximum number of entries.
    pub fn tenure(&self) -> usize {
        self.tenure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_eviction() {
        let mut list = TabuList::new(3);
        for s in 1..=5 {
            list.push(s);
            assert!(list.len() <= list.tenure());
        }
        assert!(!list.contains(1));
        assert!(!list.contains(2));
        assert!(list.contains(3));
        assert!(list.contains(5));
    }

    #[test]
    fn test_duplicate_survives_until_last_copy_evicted() {
        let mut list = TabuList::new(2);
        list.push(7);
        list.push(7);
        list.push(8);
        // queue: [7, 8]
        assert!(list.contains(7));
        list.push(9);
        // queue: [8, 9]
        assert!(!list.contains(7));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_zero_tenure_remembers_nothing() {
        let mut list = TabuList::new(0);
        list.push(1);
        assert!(list.is_empty());
        assert!(!list.contains(1));
    }

    #[test]
    fn test_signature_depends_on_order() {
        let a = [OperationId::new(0, 0), OperationId::new(1, 0)];
        let b = [OperationId::new(1, 0), OperationId::new(0, 0)];
        assert_eq!(TabuList::signature(&a), TabuList::signature(&a));
        assert_ne!(TabuList::signature(&a), TabuList::signature(&b));
    }
}
