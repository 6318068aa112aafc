//! Tests for configuration validation

use std::io::Write;

use prometheus_task_queue::config::{QueueBackendConfig, QueueConfig};

#[test]
fn test_defaults() {
    let cfg = QueueConfig::default();
    assert_eq!(cfg.concurrency, 1);
    assert!(cfg.auto_start);
    assert_eq!(cfg.backend, QueueBackendConfig::Heap);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_builder_methods() {
    let cfg = QueueConfig::new()
        .with_concurrency(8)
        .with_auto_start(false)
        .with_backend(QueueBackendConfig::Sorted);
    assert_eq!(cfg.concurrency, 8);
    assert!(!cfg.auto_start);
    assert_eq!(cfg.backend, QueueBackendConfig::Sorted);
}

#[test]
fn test_zero_concurrency_invalid() {
    let cfg = QueueConfig::new().with_concurrency(0);
    assert!(cfg.validate().is_err());
}

#[test]
fn test_from_json() {
    let json = r#"{
        "concurrency": 4,
        "auto_start": false,
        "backend": "sorted"
    }"#;

    let cfg = QueueConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.concurrency, 4);
    assert!(!cfg.auto_start);
    assert_eq!(cfg.backend, QueueBackendConfig::Sorted);
}

#[test]
fn test_from_json_partial_uses_defaults() {
    let cfg = QueueConfig::from_json_str(r#"{ "concurrency": 3 }"#).unwrap();
    assert_eq!(cfg.concurrency, 3);
    assert!(cfg.auto_start);
    assert_eq!(cfg.backend, QueueBackendConfig::Heap);
}

#[test]
fn test_from_json_rejects_non_positive_concurrency() {
    assert!(QueueConfig::from_json_str(r#"{ "concurrency": 0 }"#).is_err());
    assert!(QueueConfig::from_json_str(r#"{ "concurrency": -1 }"#).is_err());
    assert!(QueueConfig::from_json_str(r#"{ "backend": "redis" }"#).is_err());
}

#[test]
fn test_backend_from_str() {
    assert_eq!("heap".parse::<QueueBackendConfig>(), Ok(QueueBackendConfig::Heap));
    assert_eq!(" Sorted ".parse::<QueueBackendConfig>(), Ok(QueueBackendConfig::Sorted));
    assert!("fifo".parse::<QueueBackendConfig>().is_err());
}

#[test]
fn test_load_from_path() {
    let path = std::env::temp_dir().join(format!("task-queue-config-{}.json", std::process::id()));
    {
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(br#"{ "concurrency": 6 }"#).unwrap();
    }

    let cfg = QueueConfig::load_from_path(&path).unwrap();
    assert_eq!(cfg.concurrency, 6);
    std::fs::remove_file(&path).unwrap();

    let err = QueueConfig::load_from_path(&path).unwrap_err();
    assert!(err.to_string().contains("reading queue config"));
}
