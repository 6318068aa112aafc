//! Tokio runtime spawner implementation.

use std::future::Future;

use tokio::runtime::Handle;

use crate::core::{QueueError, Spawn};

/// Tokio-based spawner that executes admitted work on a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioSpawner {
    handle: Handle,
}

impl TokioSpawner {
    /// Create a `TokioSpawner` from a tokio runtime handle.
    #[must_use]
    pub const fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Create a `TokioSpawner` for the runtime the caller is running on.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::NoRuntime` when called outside a Tokio runtime.
    pub fn current() -> Result<Self, QueueError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| QueueError::NoRuntime(e.to_string()))
    }

    /// The runtime handle work is spawned on.
    #[must_use]
    pub const fn handle(&self) -> &Handle {
        &self.handle
    }
}

impl Spawn for TokioSpawner {
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handle.spawn(fut);
    }
}
