//! Binary-heap pending collection.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::core::{QueueKey, TaskQueue};
use crate::util::serde::TaskId;

/// Heap slot ordered by its key only; the payload never takes part in
/// comparisons.
struct Keyed<P> {
    key: QueueKey,
    item: P,
}

impl<P> PartialEq for Keyed<P> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<P> Eq for Keyed<P> {}

impl<P> PartialOrd for Keyed<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P> Ord for Keyed<P> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// Pending entries in a max-heap keyed by `(priority desc, seq asc)`.
/// O(log n) push and pop.
pub struct HeapQueue<P> {
    tasks: BinaryHeap<Keyed<P>>,
}

impl<P> HeapQueue<P> {
    /// Create an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tasks: BinaryHeap::new(),
        }
    }
}

impl<P> Default for HeapQueue<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Send> TaskQueue<P> for HeapQueue<P> {
    fn push(&mut self, key: QueueKey, item: P) {
        self.tasks.push(Keyed { key, item });
    }

    fn pop(&mut self) -> Option<(QueueKey, P)> {
        self.tasks.pop().map(|k| (k.key, k.item))
    }

    fn peek(&self) -> Option<QueueKey> {
        self.tasks.peek().map(|k| k.key)
    }

    fn remove(&mut self, id: TaskId) -> Option<P> {
        // Rebuild heap without the entry
        let mut found = None;
        let tasks = std::mem::take(&mut self.tasks).into_vec();
        let mut kept = Vec::with_capacity(tasks.len());
        for slot in tasks {
            if found.is_none() && slot.key.id() == id {
                found = Some(slot.item);
            } else {
                kept.push(slot);
            }
        }
        self.tasks = BinaryHeap::from(kept);
        found
    }

    fn drain_all(&mut self) -> Vec<(QueueKey, P)> {
        // into_sorted_vec is ascending; admission order is descending
        let mut sorted = std::mem::take(&mut self.tasks).into_sorted_vec();
        sorted.reverse();
        sorted.into_iter().map(|k| (k.key, k.item)).collect()
    }

    fn len(&self) -> usize {
        self.tasks.len()
    }
}
