//! Error types for scheduler operations.

use thiserror::Error;

/// Errors produced while constructing or configuring a scheduler.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Configuration failed validation (for example a zero concurrency limit).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// No Tokio runtime was available for the default spawner.
    #[error("no tokio runtime available: {0}")]
    NoRuntime(String),
}

/// Outcome delivered through a task's handle when it did not produce a value.
///
/// Every variant is scoped to a single task; none of them affect the
/// scheduler or other tasks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError<E> {
    /// The task's work ran and returned an error.
    #[error("task failed: {0}")]
    Failed(E),
    /// The task panicked while running.
    #[error("task panicked: {0}")]
    Panicked(String),
    /// The task was still pending when the queue was cleared.
    #[error("queue cleared before task was admitted")]
    Cleared,
    /// The task was cancelled by id before it was admitted.
    #[error("task cancelled before it was admitted")]
    Cancelled,
    /// The scheduler was dropped while the task was still pending.
    #[error("scheduler dropped before task completed")]
    Abandoned,
}

impl<E> TaskError<E> {
    /// Returns the work's own error, if that is why the task did not succeed.
    pub fn into_failure(self) -> Option<E> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// True when the task never ran because it was removed from the queue.
    pub const fn is_discarded(&self) -> bool {
        matches!(self, Self::Cleared | Self::Cancelled | Self::Abandoned)
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
