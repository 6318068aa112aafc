//! Configuration models for the scheduler and its pending-collection backend.

pub mod queue;

pub use queue::{QueueBackendConfig, QueueConfig};
