//! Caller-owned completion handle for a submitted task.

use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use tokio::sync::oneshot;

use crate::core::TaskError;
use crate::util::serde::TaskId;

/// Outcome of a submitted task.
pub type TaskResult<T, E> = Result<T, TaskError<E>>;

/// Handle returned by [`Scheduler::submit`](crate::core::Scheduler::submit).
///
/// Await it to get the task's outcome. Dropping the handle does not cancel the
/// task; the result is then discarded when the task finishes.
#[derive(Debug)]
#[must_use = "dropping a TaskHandle discards the task's result"]
pub struct TaskHandle<T, E> {
    id: TaskId,
    rx: Option<oneshot::Receiver<TaskResult<T, E>>>,
}

impl<T, E> TaskHandle<T, E> {
    pub(crate) const fn new(id: TaskId, rx: oneshot::Receiver<TaskResult<T, E>>) -> Self {
        Self { id, rx: Some(rx) }
    }

    /// Id assigned at submission; pass it to
    /// [`Scheduler::cancel`](crate::core::Scheduler::cancel).
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Take the outcome if the task has already settled, without waiting.
    ///
    /// Returns `None` while the task is pending or running. Once the outcome
    /// has been taken, later reads (including awaiting the handle) report
    /// [`TaskError::Abandoned`].
    pub fn try_result(&mut self) -> Option<TaskResult<T, E>> {
        let Some(rx) = self.rx.as_mut() else {
            return Some(Err(TaskError::Abandoned));
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::error::TryRecvError::Empty) => return None,
            Err(oneshot::error::TryRecvError::Closed) => Err(TaskError::Abandoned),
        };
        self.rx = None;
        Some(outcome)
    }
}

impl<T, E> Future for TaskHandle<T, E> {
    type Output = TaskResult<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let Some(rx) = self.rx.as_mut() else {
            return Poll::Ready(Err(TaskError::Abandoned));
        };
        let outcome = ready!(Pin::new(rx).poll(cx)).unwrap_or(Err(TaskError::Abandoned));
        self.rx = None;
        Poll::Ready(outcome)
    }
}
