//! Infrastructure adapters: pending-collection backends.

pub mod queue;

pub use queue::{HeapQueue, SortedQueue};
