//! Queue lifecycle events and sinks that republish them.
//!
//! A scheduler records one [`QueueEvent`] per state transition while it still
//! holds its state lock, so a sink observes transitions in the exact order
//! they happened. Sinks must not call back into the scheduler from
//! [`EventSink::record`].

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::util::clock::now_ms;
use crate::util::serde::{Priority, TaskId};

/// A scheduler state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum QueueEvent {
    /// A task entered the pending collection.
    Submitted {
        /// Task identifier.
        id: TaskId,
        /// Priority it was submitted with.
        priority: Priority,
    },
    /// A task left the pending collection and started running.
    Admitted {
        /// Task identifier.
        id: TaskId,
        /// Priority it was submitted with.
        priority: Priority,
    },
    /// An admitted task finished.
    Completed {
        /// Task identifier.
        id: TaskId,
        /// False when the task failed or panicked.
        succeeded: bool,
    },
    /// A pending task was cancelled by id.
    Cancelled {
        /// Task identifier.
        id: TaskId,
    },
    /// The pending collection was cleared.
    Cleared {
        /// Number of entries discarded.
        count: usize,
    },
    /// Admissions were suspended.
    Paused,
    /// Admissions were resumed.
    Started,
    /// Nothing pending and nothing in flight.
    Drained,
}

/// A recorded event with its timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// The transition.
    pub event: QueueEvent,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
}

impl EventRecord {
    /// Stamp an event with the current time.
    #[must_use]
    pub fn now(event: QueueEvent) -> Self {
        Self {
            event,
            created_at_ms: now_ms(),
        }
    }
}

/// Event sink abstraction.
pub trait EventSink: Send + Sync {
    /// Record an event.
    fn record(&self, record: EventRecord);
}

/// In-memory event sink for testing and dev.
///
/// Clones share one buffer, so a caller can keep a clone to inspect what the
/// scheduler recorded.
#[derive(Clone)]
pub struct InMemoryEventSink {
    events: Arc<Mutex<VecDeque<EventRecord>>>,
    max_events: usize,
}

impl InMemoryEventSink {
    /// Create a new in-memory sink with a bounded buffer.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(max_events.min(1024)))),
            max_events,
        }
    }

    /// Snapshot of stored records, oldest first.
    #[must_use]
    pub fn records(&self) -> Vec<EventRecord> {
        self.events.lock().iter().cloned().collect()
    }

    /// Snapshot of stored events without timestamps, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<QueueEvent> {
        self.events.lock().iter().map(|r| r.event.clone()).collect()
    }

    /// Ids of admitted tasks, in admission order.
    #[must_use]
    pub fn admission_order(&self) -> Vec<TaskId> {
        self.events
            .lock()
            .iter()
            .filter_map(|r| match r.event {
                QueueEvent::Admitted { id, .. } => Some(id),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for InMemoryEventSink {
    fn record(&self, record: EventRecord) {
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(record);
    }
}

/// Sink that republishes every event as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn record(&self, record: EventRecord) {
        match &record.event {
            QueueEvent::Submitted { id, priority } => {
                tracing::debug!(task_id = %id, priority = priority.value(), "task submitted");
            }
            QueueEvent::Admitted { id, priority } => {
                tracing::debug!(task_id = %id, priority = priority.value(), "task admitted");
            }
            QueueEvent::Completed { id, succeeded } => {
                tracing::debug!(task_id = %id, succeeded, "task completed");
            }
            QueueEvent::Cancelled { id } => tracing::info!(task_id = %id, "task cancelled"),
            QueueEvent::Cleared { count } => tracing::info!(count, "queue cleared"),
            QueueEvent::Paused => tracing::info!("queue paused"),
            QueueEvent::Started => tracing::info!("queue started"),
            QueueEvent::Drained => tracing::debug!("queue drained"),
        }
    }
}
