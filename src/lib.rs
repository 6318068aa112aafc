//! # Prometheus Task Queue
//!
//! An asynchronous priority task queue: submit units of async work, run at
//! most N of them at once, and get each task's outcome back through its own
//! handle.
//!
//! ## Scheduling model
//!
//! - **Bounded concurrency**: never more than `concurrency` tasks in flight
//! - **Priority admission**: higher priority first, FIFO within a priority;
//!   running tasks are never preempted
//! - **Pause / resume**: pausing suspends admissions only; running tasks finish
//! - **Drain notification**: observers fire once each time the queue goes from
//!   busy to empty (nothing pending, nothing running)
//! - **Scoped failures**: a failing or panicking task settles only its own
//!   handle and still frees its slot
//! - **No silent drops**: `clear` and `cancel` reject the handles they discard
//!
//! ## Scheduler
//!
//! ```rust,ignore
//! use prometheus_task_queue::builders::SchedulerBuilder;
//! use prometheus_task_queue::core::{InMemoryEventSink, Scheduler, TaskError};
//!
//! let events = InMemoryEventSink::new(1024);
//! let queue: Scheduler<String, std::io::Error> = SchedulerBuilder::new()
//!     .concurrency(2)
//!     .event_sink(events.clone())
//!     .build()?;
//!
//! queue.on_drain(|| tracing::info!("all work done"));
//!
//! let report = queue.submit_with_priority(|| async { Ok("report".to_string()) }, 10);
//! let cleanup = queue.submit(|| async { Ok("cleanup".to_string()) });
//!
//! assert_eq!(report.await?, "report");
//! queue.wait_drained().await;
//! ```
//!
//! Configuration can also come from JSON or `TASK_QUEUE_*` environment
//! variables, see [`config::QueueConfig`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions: scheduler, handles, errors, events.
pub mod core;
/// Configuration models for the scheduler and its backends.
pub mod config;
/// Builders to construct schedulers from configuration.
pub mod builders;
/// Infrastructure adapters for pending-collection backends.
pub mod infra;
/// Runtime adapters that execute admitted work.
pub mod runtime;
/// Shared utilities.
pub mod util;

pub use crate::builders::SchedulerBuilder;
pub use crate::config::QueueConfig;
pub use crate::core::{QueueError, Scheduler, TaskError, TaskHandle};
pub use crate::util::serde::{Priority, TaskId};
