//! Tests for utility functions

use prometheus_task_queue::util::{now_ms, Priority, TaskId};

#[test]
fn test_priority_ordering() {
    assert!(Priority::CRITICAL > Priority::HIGH);
    assert!(Priority::HIGH > Priority::NORMAL);
    assert!(Priority::NORMAL > Priority::LOW);
    assert_eq!(Priority::default(), Priority::NORMAL);
}

#[test]
fn test_priority_from_signed() {
    let p: Priority = (-7).into();
    assert_eq!(p.value(), -7);
    assert_eq!(p.to_string(), "-7");
    assert_eq!(serde_json::to_string(&Priority(5)).unwrap(), "5");
}

#[test]
fn test_task_id() {
    let id = TaskId(12345);
    assert_eq!(id.get(), 12345);
    assert_eq!(id.to_string(), "task-12345");
    assert!(TaskId(1) < TaskId(2));
}

#[test]
fn test_now_ms_advances() {
    let a = now_ms();
    let b = now_ms();
    assert!(a > 0);
    assert!(b >= a);
}
