//! Ordering key and backend abstraction for the pending collection.

use std::cmp::Ordering;

use crate::util::serde::{Priority, TaskId};

/// Admission key for a pending entry.
///
/// Keys order so that the *greater* key is admitted first: higher priority
/// wins, and among equal priorities the lower (earlier) sequence wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueueKey {
    /// Caller-supplied priority.
    pub priority: Priority,
    /// Submission sequence; unique per scheduler.
    pub seq: u64,
}

impl QueueKey {
    /// Build a key for the task with the given id.
    #[must_use]
    pub const fn new(priority: Priority, id: TaskId) -> Self {
        Self {
            priority,
            seq: id.0,
        }
    }

    /// Task id this key was built from.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        TaskId(self.seq)
    }
}

impl PartialOrd for QueueKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // FIFO within same priority: earlier seq wins (reversed for max ordering)
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Abstraction for pending-collection backends.
///
/// Implementations must hand entries back in admission order: descending
/// [`QueueKey`]. Keys are unique, so the order is total.
pub trait TaskQueue<P>: Send {
    /// Insert an entry at the position dictated by its key.
    fn push(&mut self, key: QueueKey, item: P);
    /// Remove and return the next entry to admit.
    fn pop(&mut self) -> Option<(QueueKey, P)>;
    /// Key of the next entry to admit, without removing it.
    fn peek(&self) -> Option<QueueKey>;
    /// Remove the entry submitted as `id`, if it is still queued.
    fn remove(&mut self, id: TaskId) -> Option<P>;
    /// Remove every entry, returned in admission order.
    fn drain_all(&mut self) -> Vec<(QueueKey, P)>;
    /// Current depth.
    fn len(&self) -> usize;
    /// True when nothing is queued.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
