//! Tests for error types

use prometheus_task_queue::core::{QueueError, TaskError};

#[test]
fn test_invalid_config_error() {
    let err = QueueError::InvalidConfig("concurrency must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: concurrency must be greater than 0"
    );
}

#[test]
fn test_no_runtime_error() {
    let err = QueueError::NoRuntime("no reactor".to_string());
    assert_eq!(format!("{}", err), "no tokio runtime available: no reactor");
}

#[test]
fn test_task_error_display() {
    assert_eq!(
        TaskError::Failed("disk full".to_string()).to_string(),
        "task failed: disk full"
    );
    assert_eq!(
        TaskError::<String>::Panicked("boom".into()).to_string(),
        "task panicked: boom"
    );
    assert_eq!(
        TaskError::<String>::Cleared.to_string(),
        "queue cleared before task was admitted"
    );
    assert_eq!(
        TaskError::<String>::Cancelled.to_string(),
        "task cancelled before it was admitted"
    );
}

#[test]
fn test_task_error_helpers() {
    assert_eq!(TaskError::Failed(3).into_failure(), Some(3));
    assert_eq!(TaskError::<i32>::Cleared.into_failure(), None);

    assert!(TaskError::<i32>::Cleared.is_discarded());
    assert!(TaskError::<i32>::Cancelled.is_discarded());
    assert!(TaskError::<i32>::Abandoned.is_discarded());
    assert!(!TaskError::Failed(1).is_discarded());
    assert!(!TaskError::<i32>::Panicked(String::new()).is_discarded());
}

#[test]
fn test_task_error_is_std_error() {
    fn boxed(err: TaskError<std::io::Error>) -> Box<dyn std::error::Error> {
        Box::new(err)
    }
    let err = boxed(TaskError::Failed(std::io::Error::other("io")));
    assert_eq!(err.to_string(), "task failed: io");
}
