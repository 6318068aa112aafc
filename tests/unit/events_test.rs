//! Tests for event sinks

use prometheus_task_queue::core::{
    EventRecord, EventSink, InMemoryEventSink, QueueEvent, TracingEventSink,
};
use prometheus_task_queue::util::serde::{Priority, TaskId};

#[test]
fn test_in_memory_event_sink() {
    let sink = InMemoryEventSink::new(10);
    let reader = sink.clone();

    sink.record(EventRecord::now(QueueEvent::Submitted {
        id: TaskId(1),
        priority: Priority(3),
    }));
    sink.record(EventRecord::now(QueueEvent::Admitted {
        id: TaskId(1),
        priority: Priority(3),
    }));

    let records = reader.records();
    assert_eq!(records.len(), 2);
    assert!(records[0].created_at_ms > 0);
    assert_eq!(reader.admission_order(), vec![TaskId(1)]);
}

#[test]
fn test_event_sink_overflow() {
    let sink = InMemoryEventSink::new(2);

    sink.record(EventRecord::now(QueueEvent::Paused));
    sink.record(EventRecord::now(QueueEvent::Started));
    sink.record(EventRecord::now(QueueEvent::Drained));

    assert_eq!(sink.events(), vec![QueueEvent::Started, QueueEvent::Drained]);
}

#[test]
fn test_event_serialization() {
    let event = QueueEvent::Completed {
        id: TaskId(4),
        succeeded: false,
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["action"], "completed");
    assert_eq!(json["id"], 4);
    assert_eq!(json["succeeded"], false);

    let cleared: QueueEvent = serde_json::from_str(r#"{"action":"cleared","count":3}"#).unwrap();
    assert_eq!(cleared, QueueEvent::Cleared { count: 3 });
}

#[test]
fn test_tracing_sink_accepts_every_event() {
    prometheus_task_queue::util::init_tracing();
    let sink = TracingEventSink;
    for event in [
        QueueEvent::Submitted {
            id: TaskId(0),
            priority: Priority::NORMAL,
        },
        QueueEvent::Admitted {
            id: TaskId(0),
            priority: Priority::NORMAL,
        },
        QueueEvent::Completed {
            id: TaskId(0),
            succeeded: true,
        },
        QueueEvent::Cancelled { id: TaskId(1) },
        QueueEvent::Cleared { count: 2 },
        QueueEvent::Paused,
        QueueEvent::Started,
        QueueEvent::Drained,
    ] {
        sink.record(EventRecord::now(event));
    }
}
