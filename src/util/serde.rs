//! Serializable identifier and priority types shared across the crate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier assigned to a task at submission.
///
/// Ids come from a per-scheduler sequence, so a smaller id was submitted
/// earlier. The sequence also breaks ties between entries of equal priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl TaskId {
    /// Raw sequence number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// Signed task priority. Higher values are admitted sooner.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Priority(pub i32);

impl Priority {
    /// Background work.
    pub const LOW: Self = Self(-10);
    /// Default priority for plain `submit`.
    pub const NORMAL: Self = Self(0);
    /// Ahead of normal work.
    pub const HIGH: Self = Self(10);
    /// Ahead of everything else.
    pub const CRITICAL: Self = Self(100);

    /// Raw priority value.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl From<i32> for Priority {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
