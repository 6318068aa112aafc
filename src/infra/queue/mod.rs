//! Pending-collection backends.

pub mod heap;
pub mod sorted;

pub use heap::HeapQueue;
pub use sorted::SortedQueue;

use crate::config::QueueBackendConfig;
use crate::core::TaskQueue;

/// Build the backend selected in configuration.
pub(crate) fn build_backend<P>(backend: QueueBackendConfig) -> Box<dyn TaskQueue<P>>
where
    P: Send + 'static,
{
    match backend {
        QueueBackendConfig::Heap => Box::new(HeapQueue::new()),
        QueueBackendConfig::Sorted => Box::new(SortedQueue::new()),
    }
}
