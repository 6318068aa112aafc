//! Runtime adapters that execute admitted work.

pub mod tokio_spawner;

pub use tokio_spawner::TokioSpawner;
