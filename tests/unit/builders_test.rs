//! Tests for builder modules

use prometheus_task_queue::builders::SchedulerBuilder;
use prometheus_task_queue::config::{QueueBackendConfig, QueueConfig};
use prometheus_task_queue::core::{InMemoryEventSink, QueueError, QueueEvent, Scheduler};
use prometheus_task_queue::runtime::TokioSpawner;

#[test]
fn test_builder_defaults() {
    let builder = SchedulerBuilder::new();
    assert_eq!(builder.config(), &QueueConfig::default());
}

#[test]
fn test_builder_overrides() {
    let builder = SchedulerBuilder::from_config(QueueConfig::new().with_concurrency(2))
        .concurrency(5)
        .auto_start(false)
        .backend(QueueBackendConfig::Sorted);
    assert_eq!(builder.config().concurrency, 5);
    assert!(!builder.config().auto_start);
    assert_eq!(builder.config().backend, QueueBackendConfig::Sorted);
}

#[test]
fn test_builder_rejects_zero_concurrency() {
    let result: Result<Scheduler<(), ()>, _> = SchedulerBuilder::new().concurrency(0).build();
    assert!(matches!(result, Err(QueueError::InvalidConfig(_))));
}

#[tokio::test]
async fn test_build_with_explicit_spawner() {
    let sink = InMemoryEventSink::new(16);
    let queue: Scheduler<&'static str, ()> = SchedulerBuilder::new()
        .concurrency(3)
        .auto_start(false)
        .event_sink(sink.clone())
        .build_with_spawner(TokioSpawner::new(tokio::runtime::Handle::current()))
        .unwrap();

    assert_eq!(queue.concurrency(), 3);
    assert!(queue.is_paused());

    let handle = queue.submit(|| async { Ok("done") });
    queue.start();
    assert_eq!(handle.await, Ok("done"));
    queue.pause();

    let events = sink.events();
    assert!(matches!(events.first(), Some(QueueEvent::Submitted { .. })));
    assert!(events.contains(&QueueEvent::Started));
    assert_eq!(events.last(), Some(&QueueEvent::Paused));
}
