//! Sorted-list pending collection.

use std::collections::VecDeque;

use crate::core::{QueueKey, TaskQueue};
use crate::util::serde::TaskId;

/// Pending entries kept in admission order on every insertion.
///
/// Insertion binary-searches for the slot after every entry that outranks the
/// new one, which is a stable sort by descending priority. Popping the head is
/// O(1); insertion is O(n) in the worst case.
pub struct SortedQueue<P> {
    tasks: VecDeque<(QueueKey, P)>,
}

impl<P> SortedQueue<P> {
    /// Create an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }

    /// Keys in admission order.
    pub fn keys(&self) -> impl Iterator<Item = QueueKey> + '_ {
        self.tasks.iter().map(|(k, _)| *k)
    }
}

impl<P> Default for SortedQueue<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Send> TaskQueue<P> for SortedQueue<P> {
    fn push(&mut self, key: QueueKey, item: P) {
        let at = self.tasks.partition_point(|(k, _)| *k > key);
        self.tasks.insert(at, (key, item));
    }

    fn pop(&mut self) -> Option<(QueueKey, P)> {
        self.tasks.pop_front()
    }

    fn peek(&self) -> Option<QueueKey> {
        self.tasks.front().map(|(k, _)| *k)
    }

    fn remove(&mut self, id: TaskId) -> Option<P> {
        let at = self.tasks.iter().position(|(k, _)| k.id() == id)?;
        self.tasks.remove(at).map(|(_, item)| item)
    }

    fn drain_all(&mut self) -> Vec<(QueueKey, P)> {
        self.tasks.drain(..).collect()
    }

    fn len(&self) -> usize {
        self.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::serde::Priority;

    fn key(priority: i32, seq: u64) -> QueueKey {
        QueueKey::new(Priority(priority), TaskId(seq))
    }

    #[test]
    fn test_insertion_keeps_admission_order() {
        let mut q = SortedQueue::new();
        q.push(key(0, 0), "t1");
        q.push(key(0, 1), "t2");
        q.push(key(5, 2), "t3");
        q.push(key(-3, 3), "t4");
        q.push(key(5, 4), "t5");

        let seqs: Vec<u64> = q.keys().map(|k| k.seq).collect();
        assert_eq!(seqs, vec![2, 4, 0, 1, 3]);
        assert_eq!(q.pop().map(|(_, n)| n), Some("t3"));
        assert_eq!(q.peek(), Some(key(5, 4)));
    }

    #[test]
    fn test_remove_and_drain() {
        let mut q = SortedQueue::new();
        q.push(key(1, 0), 'a');
        q.push(key(2, 1), 'b');
        q.push(key(1, 2), 'c');

        assert_eq!(q.remove(TaskId(0)), Some('a'));
        assert_eq!(q.remove(TaskId(9)), None);

        let drained: Vec<char> = q.drain_all().into_iter().map(|(_, c)| c).collect();
        assert_eq!(drained, vec!['b', 'c']);
        assert!(q.is_empty());
    }

    #[test]
    fn test_matches_heap_ordering() {
        use crate::infra::queue::HeapQueue;
        use rand::Rng;

        let mut rng = rand::rng();
        let mut sorted = SortedQueue::new();
        let mut heap = HeapQueue::new();
        for seq in 0..200 {
            let k = key(rng.random_range(-3..=3), seq);
            sorted.push(k, seq);
            heap.push(k, seq);
        }
        while let Some((k, _)) = heap.pop() {
            assert_eq!(sorted.pop().map(|(sk, _)| sk), Some(k));
        }
        assert!(sorted.is_empty());
    }
}
