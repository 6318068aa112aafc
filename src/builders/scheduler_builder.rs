//! Fluent construction of a [`Scheduler`].

use std::sync::Arc;

use crate::config::{QueueBackendConfig, QueueConfig};
use crate::core::{EventSink, QueueError, Scheduler, Spawn};
use crate::runtime::TokioSpawner;

/// Builder for [`Scheduler`].
///
/// ```rust,ignore
/// let sink = InMemoryEventSink::new(256);
/// let queue: Scheduler<String, anyhow::Error> = SchedulerBuilder::new()
///     .concurrency(4)
///     .auto_start(false)
///     .event_sink(sink.clone())
///     .build()?;
/// ```
#[derive(Clone, Default)]
pub struct SchedulerBuilder {
    config: QueueConfig,
    events: Option<Arc<dyn EventSink>>,
}

impl SchedulerBuilder {
    /// Start from the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    #[must_use]
    pub fn from_config(config: QueueConfig) -> Self {
        Self {
            config,
            events: None,
        }
    }

    /// Set the concurrency limit.
    #[must_use]
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency;
        self
    }

    /// Set whether the scheduler starts admitting immediately.
    #[must_use]
    pub fn auto_start(mut self, auto_start: bool) -> Self {
        self.config.auto_start = auto_start;
        self
    }

    /// Select the pending-collection backend.
    #[must_use]
    pub fn backend(mut self, backend: QueueBackendConfig) -> Self {
        self.config.backend = backend;
        self
    }

    /// Attach a sink that receives every queue event.
    #[must_use]
    pub fn event_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.events = Some(Arc::new(sink));
        self
    }

    /// Configuration the scheduler will be built with.
    #[must_use]
    pub const fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Build a scheduler on the current Tokio runtime.
    ///
    /// # Errors
    ///
    /// - `QueueError::InvalidConfig` if the configuration fails validation
    /// - `QueueError::NoRuntime` when called outside a Tokio runtime
    pub fn build<T, E>(self) -> Result<Scheduler<T, E, TokioSpawner>, QueueError>
    where
        T: Send + 'static,
        E: Send + 'static,
    {
        self.config.validate().map_err(QueueError::InvalidConfig)?;
        let spawner = TokioSpawner::current()?;
        self.build_with_spawner(spawner)
    }

    /// Build a scheduler that hands admitted work to `spawner`.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::InvalidConfig` if the configuration fails
    /// validation.
    pub fn build_with_spawner<T, E, S>(self, spawner: S) -> Result<Scheduler<T, E, S>, QueueError>
    where
        T: Send + 'static,
        E: Send + 'static,
        S: Spawn + Send + Sync + 'static,
    {
        Scheduler::from_parts(&self.config, spawner, self.events)
    }
}
