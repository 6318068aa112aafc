//! Reusable executors that turn payloads into task work.

use async_trait::async_trait;

/// Abstraction for executing a task payload and producing a result.
///
/// An executor is shared by every task submitted through
/// [`Scheduler::submit_payload`](crate::core::Scheduler::submit_payload); each
/// submission clones it and calls [`execute`](Self::execute) once on
/// admission.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use prometheus_task_queue::core::TaskExecutor;
///
/// #[derive(Clone)]
/// struct Fetcher { client: reqwest::Client }
///
/// #[async_trait]
/// impl TaskExecutor<String, String, reqwest::Error> for Fetcher {
///     async fn execute(&self, url: String) -> Result<String, reqwest::Error> {
///         self.client.get(url).send().await?.text().await
///     }
/// }
/// ```
#[async_trait]
pub trait TaskExecutor<P, T, E>: Send + Sync + Clone + 'static
where
    P: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    /// Execute a task payload and return its result.
    async fn execute(&self, payload: P) -> Result<T, E>;
}
