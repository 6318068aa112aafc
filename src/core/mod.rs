//! Core scheduling abstractions: the scheduler, its handles, errors and
//! events.

pub mod error;
pub mod events;
pub mod executor;
pub mod handle;
pub mod queue;
pub mod scheduler;

pub use error::{AppResult, QueueError, TaskError};
pub use events::{EventRecord, EventSink, InMemoryEventSink, QueueEvent, TracingEventSink};
pub use executor::TaskExecutor;
pub use handle::{TaskHandle, TaskResult};
pub use queue::{QueueKey, TaskQueue};
pub use scheduler::{DrainObserver, QueueStats, Scheduler, Spawn, WeakScheduler};
