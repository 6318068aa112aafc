//! Priority scheduler with bounded concurrency, pause/resume and drain
//! notification.
//!
//! All bookkeeping (pending collection, in-flight count, pause flag, drain
//! observers) lives behind one `parking_lot::Mutex`. The lock is never held
//! while caller code runs: work closures, task futures, drain observers and
//! handle settlement all happen after it is released.

use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use futures::future::{self, BoxFuture, FutureExt};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::{oneshot, Notify};
use tracing::{debug, info, warn};

use crate::builders::SchedulerBuilder;
use crate::config::QueueConfig;
use crate::core::events::{EventRecord, EventSink, QueueEvent};
use crate::core::handle::TaskResult;
use crate::core::{QueueError, QueueKey, TaskError, TaskExecutor, TaskHandle, TaskQueue};
use crate::infra::queue::build_backend;
use crate::runtime::TokioSpawner;
use crate::util::serde::{Priority, TaskId};

/// Abstraction for spawning admitted work on a runtime.
pub trait Spawn {
    /// Spawn a detached future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Callback fired each time the scheduler becomes drained.
pub type DrainObserver = Arc<dyn Fn() + Send + Sync>;

type Work<T, E> = Box<dyn FnOnce() -> BoxFuture<'static, Result<T, E>> + Send>;

/// A submitted task waiting for admission. Its id and priority live in the
/// [`QueueKey`] it is stored under.
struct PendingTask<T, E> {
    work: Work<T, E>,
    completion: oneshot::Sender<TaskResult<T, E>>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    submitted: u64,
    completed: u64,
    failed: u64,
    cancelled: u64,
}

/// Snapshot of scheduler utilization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    /// Concurrency limit.
    pub concurrency: usize,
    /// Tasks waiting for admission.
    pub pending: usize,
    /// Tasks currently running.
    pub in_flight: usize,
    /// Whether admissions are suspended.
    pub paused: bool,
    /// Total tasks submitted.
    pub submitted: u64,
    /// Total tasks that finished successfully.
    pub completed: u64,
    /// Total tasks that failed or panicked.
    pub failed: u64,
    /// Total tasks discarded by `clear` or `cancel` before admission.
    pub cancelled: u64,
}

struct State<T, E> {
    pending: Box<dyn TaskQueue<PendingTask<T, E>>>,
    in_flight: usize,
    paused: bool,
    next_seq: u64,
    drain_observers: Vec<DrainObserver>,
    counters: Counters,
}

struct Shared<T, E, S> {
    concurrency: usize,
    spawner: S,
    events: Option<Arc<dyn EventSink>>,
    drained: Notify,
    state: Mutex<State<T, E>>,
}

/// Asynchronous priority task queue.
///
/// Runs at most `concurrency` tasks at once. Pending tasks are admitted by
/// descending priority, first-come first-served within a priority. Cloning a
/// `Scheduler` yields another handle to the same queue.
///
/// # Example
///
/// ```rust,ignore
/// use prometheus_task_queue::{config::QueueConfig, core::Scheduler};
///
/// let queue: Scheduler<u32, std::io::Error> =
///     Scheduler::new(QueueConfig::new().with_concurrency(2))?;
/// let low = queue.submit(|| async { Ok(1) });
/// let high = queue.submit_with_priority(|| async { Ok(2) }, 5);
/// assert_eq!(high.await?, 2);
/// ```
pub struct Scheduler<T, E, S = TokioSpawner> {
    shared: Arc<Shared<T, E, S>>,
}

impl<T, E, S> Clone for Scheduler<T, E, S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// Weak reference to a [`Scheduler`] that does not keep its queue alive.
pub struct WeakScheduler<T, E, S = TokioSpawner> {
    shared: Weak<Shared<T, E, S>>,
}

impl<T, E, S> Clone for WeakScheduler<T, E, S> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<T, E, S> WeakScheduler<T, E, S> {
    /// The scheduler, if any strong handle to it is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Scheduler<T, E, S>> {
        self.shared.upgrade().map(|shared| Scheduler { shared })
    }
}

impl<T, E> Scheduler<T, E, TokioSpawner>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Create a scheduler that spawns admitted work on the current Tokio
    /// runtime.
    ///
    /// # Errors
    ///
    /// - `QueueError::InvalidConfig` if the concurrency limit is zero
    /// - `QueueError::NoRuntime` when called outside a Tokio runtime
    pub fn new(config: QueueConfig) -> Result<Self, QueueError> {
        SchedulerBuilder::from_config(config).build()
    }
}

impl<T, E, S> Scheduler<T, E, S>
where
    T: Send + 'static,
    E: Send + 'static,
    S: Spawn + Send + Sync + 'static,
{
    /// Create a scheduler that hands admitted work to `spawner`.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::InvalidConfig` if the concurrency limit is zero.
    pub fn with_spawner(config: QueueConfig, spawner: S) -> Result<Self, QueueError> {
        SchedulerBuilder::from_config(config).build_with_spawner(spawner)
    }

    pub(crate) fn from_parts(
        config: &QueueConfig,
        spawner: S,
        events: Option<Arc<dyn EventSink>>,
    ) -> Result<Self, QueueError> {
        config.validate().map_err(QueueError::InvalidConfig)?;

        info!(
            concurrency = config.concurrency,
            auto_start = config.auto_start,
            backend = ?config.backend,
            "scheduler initialized"
        );

        Ok(Self {
            shared: Arc::new(Shared {
                concurrency: config.concurrency,
                spawner,
                events,
                drained: Notify::new(),
                state: Mutex::new(State {
                    pending: build_backend(config.backend),
                    in_flight: 0,
                    paused: !config.auto_start,
                    next_seq: 0,
                    drain_observers: Vec::new(),
                    counters: Counters::default(),
                }),
            }),
        })
    }

    /// Submit work at the default priority. See
    /// [`submit_with_priority`](Self::submit_with_priority).
    pub fn submit<F, Fut>(&self, work: F) -> TaskHandle<T, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        self.submit_with_priority(work, Priority::NORMAL)
    }

    /// Submit work and return its handle immediately.
    ///
    /// The entry is queued by priority and, unless the scheduler is paused, an
    /// admission pass runs before this returns. `work` is called once, when
    /// the spawned task first runs, so it never executes inside this call.
    /// Submission never fails: the work's own errors, panics, and removal by
    /// `clear`/`cancel` are all reported through the handle.
    pub fn submit_with_priority<F, Fut>(
        &self,
        work: F,
        priority: impl Into<Priority>,
    ) -> TaskHandle<T, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let priority = priority.into();
        let (tx, rx) = oneshot::channel();
        let work: Work<T, E> = Box::new(move || work().boxed());

        let (id, admitted) = {
            let mut state = self.shared.state.lock();
            let id = TaskId(state.next_seq);
            state.next_seq += 1;
            state.counters.submitted += 1;
            state.pending.push(
                QueueKey::new(priority, id),
                PendingTask {
                    work,
                    completion: tx,
                },
            );
            self.shared.emit(QueueEvent::Submitted { id, priority });
            debug!(
                task_id = %id,
                priority = priority.value(),
                pending = state.pending.len(),
                "task submitted"
            );
            (id, self.shared.admit(&mut state))
        };

        Shared::launch(&self.shared, admitted);
        TaskHandle::new(id, rx)
    }

    /// Submit `payload` to a shared executor.
    pub fn submit_payload<X, P>(
        &self,
        executor: &X,
        payload: P,
        priority: impl Into<Priority>,
    ) -> TaskHandle<T, E>
    where
        X: TaskExecutor<P, T, E>,
        P: Send + 'static,
    {
        let executor = executor.clone();
        self.submit_with_priority(
            move || async move { executor.execute(payload).await },
            priority,
        )
    }

    /// Resume admissions. No-op if already running.
    pub fn start(&self) {
        let admitted = {
            let mut state = self.shared.state.lock();
            if !state.paused {
                return;
            }
            state.paused = false;
            self.shared.emit(QueueEvent::Started);
            info!(pending = state.pending.len(), "queue started");
            self.shared.admit(&mut state)
        };
        Shared::launch(&self.shared, admitted);
    }

    /// Suspend admissions. Tasks already running are unaffected.
    pub fn pause(&self) {
        let mut state = self.shared.state.lock();
        if state.paused {
            return;
        }
        state.paused = true;
        self.shared.emit(QueueEvent::Paused);
        info!(in_flight = state.in_flight, "queue paused");
    }

    /// Discard every pending task; each handle resolves to
    /// [`TaskError::Cleared`]. Running tasks are unaffected. Returns the
    /// number of tasks discarded.
    pub fn clear(&self) -> usize {
        let (removed, observers) = {
            let mut state = self.shared.state.lock();
            let removed = state.pending.drain_all();
            if removed.is_empty() {
                return 0;
            }
            state.counters.cancelled += removed.len() as u64;
            self.shared.emit(QueueEvent::Cleared {
                count: removed.len(),
            });
            (removed, self.shared.check_drained(&state))
        };

        let count = removed.len();
        info!(count, "queue cleared");
        for (_, task) in removed {
            let _ = task.completion.send(Err(TaskError::Cleared));
        }
        if let Some(observers) = observers {
            self.shared.notify_drained(&observers);
        }
        count
    }

    /// Discard one pending task by id; its handle resolves to
    /// [`TaskError::Cancelled`]. Returns false if the task is unknown or has
    /// already been admitted.
    pub fn cancel(&self, id: TaskId) -> bool {
        let (task, observers) = {
            let mut state = self.shared.state.lock();
            let Some(task) = state.pending.remove(id) else {
                return false;
            };
            state.counters.cancelled += 1;
            self.shared.emit(QueueEvent::Cancelled { id });
            (task, self.shared.check_drained(&state))
        };

        debug!(task_id = %id, "task cancelled");
        let _ = task.completion.send(Err(TaskError::Cancelled));
        if let Some(observers) = observers {
            self.shared.notify_drained(&observers);
        }
        true
    }

    /// Register a callback fired on every transition into the drained state.
    ///
    /// Observers run in registration order, outside the scheduler lock, so
    /// they may call back into the scheduler. A panicking observer is logged
    /// and does not stop the others. Registering while already drained does
    /// not fire the observer until the next transition.
    ///
    /// Observers are owned by the scheduler. One that captures a `Scheduler`
    /// clone keeps the queue alive after every other handle is dropped, so
    /// pending handles never resolve to [`TaskError::Abandoned`]. Capture a
    /// [`WeakScheduler`] from [`Scheduler::downgrade`] instead.
    pub fn on_drain<F>(&self, observer: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.shared.state.lock().drain_observers.push(Arc::new(observer));
    }

    /// Non-owning handle to this scheduler.
    #[must_use]
    pub fn downgrade(&self) -> WeakScheduler<T, E, S> {
        WeakScheduler {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Wait until nothing is pending and nothing is running. Resolves
    /// immediately if that is already the case.
    pub async fn wait_drained(&self) {
        let notified = self.shared.drained.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_drained() {
            return;
        }
        notified.await;
    }

    /// Number of tasks waiting for admission.
    #[must_use]
    pub fn size(&self) -> usize {
        self.shared.state.lock().pending.len()
    }

    /// Number of tasks currently running.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.shared.state.lock().in_flight
    }

    /// Whether admissions are suspended.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.shared.state.lock().paused
    }

    /// Whether a newly submitted task would be admitted right away.
    #[must_use]
    pub fn can_admit_more(&self) -> bool {
        let state = self.shared.state.lock();
        !state.paused && state.in_flight < self.shared.concurrency
    }

    /// Whether nothing is pending and nothing is running.
    #[must_use]
    pub fn is_drained(&self) -> bool {
        let state = self.shared.state.lock();
        state.pending.is_empty() && state.in_flight == 0
    }

    /// Concurrency limit fixed at construction.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.shared.concurrency
    }

    /// Current statistics.
    #[must_use]
    pub fn stats(&self) -> QueueStats {
        let state = self.shared.state.lock();
        QueueStats {
            concurrency: self.shared.concurrency,
            pending: state.pending.len(),
            in_flight: state.in_flight,
            paused: state.paused,
            submitted: state.counters.submitted,
            completed: state.counters.completed,
            failed: state.counters.failed,
            cancelled: state.counters.cancelled,
        }
    }
}

impl<T, E, S> Shared<T, E, S>
where
    T: Send + 'static,
    E: Send + 'static,
    S: Spawn + Send + Sync + 'static,
{
    fn emit(&self, event: QueueEvent) {
        if let Some(sink) = &self.events {
            sink.record(EventRecord::now(event));
        }
    }

    /// Pop entries while a slot is free. Each popped entry is counted in
    /// flight before its work is started by [`Self::launch`].
    fn admit(&self, state: &mut State<T, E>) -> Vec<(QueueKey, PendingTask<T, E>)> {
        let mut admitted = Vec::new();
        while !state.paused && state.in_flight < self.concurrency {
            let Some((key, task)) = state.pending.pop() else {
                break;
            };
            state.in_flight += 1;
            self.emit(QueueEvent::Admitted {
                id: key.id(),
                priority: key.priority,
            });
            debug!(
                task_id = %key.id(),
                priority = key.priority.value(),
                in_flight = state.in_flight,
                "task admitted"
            );
            admitted.push((key, task));
        }
        admitted
    }

    /// Hand admitted work to the spawner in admission order. The work closure
    /// is called inside the spawned future, never on the admitting stack.
    fn launch(this: &Arc<Self>, admitted: Vec<(QueueKey, PendingTask<T, E>)>) {
        for (key, task) in admitted {
            let id = key.id();
            let PendingTask { work, completion } = task;
            let shared = Arc::clone(this);
            this.spawner.spawn(async move {
                let outcome = start_work(work).await;
                Self::finish(&shared, id, completion, outcome);
            });
        }
    }

    /// Release the task's slot, settle its handle, then admit more work and
    /// notify drain observers if this completion emptied the scheduler.
    fn finish(
        this: &Arc<Self>,
        id: TaskId,
        completion: oneshot::Sender<TaskResult<T, E>>,
        outcome: TaskResult<T, E>,
    ) {
        let succeeded = outcome.is_ok();
        let (admitted, observers) = {
            let mut state = this.state.lock();
            state.in_flight -= 1;
            if succeeded {
                state.counters.completed += 1;
            } else {
                state.counters.failed += 1;
            }
            this.emit(QueueEvent::Completed { id, succeeded });
            let admitted = this.admit(&mut state);
            (admitted, this.check_drained(&state))
        };

        match &outcome {
            Ok(_) => debug!(task_id = %id, "task completed"),
            Err(TaskError::Panicked(msg)) => warn!(task_id = %id, panic = %msg, "task panicked"),
            Err(_) => debug!(task_id = %id, "task failed"),
        }
        if completion.send(outcome).is_err() {
            debug!(task_id = %id, "task handle dropped before completion");
        }

        Self::launch(this, admitted);
        if let Some(observers) = observers {
            this.notify_drained(&observers);
        }
    }

    /// Snapshot the observers if the scheduler is drained. Callers invoke this
    /// only right after a transition that could empty it, which makes the
    /// notification fire once per transition.
    fn check_drained(&self, state: &State<T, E>) -> Option<Vec<DrainObserver>> {
        if state.pending.is_empty() && state.in_flight == 0 {
            self.emit(QueueEvent::Drained);
            debug!("queue drained");
            Some(state.drain_observers.clone())
        } else {
            None
        }
    }

    fn notify_drained(&self, observers: &[DrainObserver]) {
        self.drained.notify_waiters();
        for (idx, observer) in observers.iter().enumerate() {
            if panic::catch_unwind(AssertUnwindSafe(|| observer())).is_err() {
                warn!(observer = idx, "drain observer panicked");
            }
        }
    }
}

/// Call the work closure and wrap its future so that errors and panics both
/// become a [`TaskResult`].
fn start_work<T, E>(work: Work<T, E>) -> BoxFuture<'static, TaskResult<T, E>>
where
    T: Send + 'static,
    E: Send + 'static,
{
    match panic::catch_unwind(AssertUnwindSafe(work)) {
        Ok(fut) => AssertUnwindSafe(fut)
            .catch_unwind()
            .map(|caught| match caught {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(e)) => Err(TaskError::Failed(e)),
                Err(payload) => Err(TaskError::Panicked(panic_message(&*payload))),
            })
            .boxed(),
        Err(payload) => {
            future::ready(Err(TaskError::Panicked(panic_message(&*payload)))).boxed()
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".into())
}
