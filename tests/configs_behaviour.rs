use std::error::Error;
use std::path::PathBuf;
use std::str::FromStr;

use watchrun::config::load_and_validate;
use watchrun::engine::PendingRuns;
use watchrun::types::BusyBehaviour;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn pytest_watch_toml_uses_defaults() -> TestResult {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cfg = load_and_validate(manifest.join("tests/configs/pytest-watch.toml"))?;

    assert_eq!(cfg.config.debounce_ms, 300);
    assert_eq!(cfg.config.triggered_while_running, BusyBehaviour::Queue);
    assert_eq!(cfg.config.queue_length, 1);

    let python = cfg.watch.get("python").expect("watch.python missing");
    assert_eq!(python.files, vec!["**/*.py".to_string()]);
    assert_eq!(python.tasks, vec!["test".to_string()]);
    assert_eq!(cfg.task.get("test").map(|t| t.cmd.as_str()), Some("pytest"));

    Ok(())
}

#[test]
fn behaviour_toml_drives_queue_config() -> TestResult {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cfg = load_and_validate(manifest.join("tests/configs/behaviour.toml"))?;

    assert_eq!(cfg.config.debounce_ms, 150);
    assert_eq!(cfg.config.triggered_while_running, BusyBehaviour::Cancel);
    assert_eq!(cfg.config.queue_length, 2);

    let q = PendingRuns::new(cfg.config.triggered_while_running, cfg.config.queue_length);
    assert_eq!(q.behaviour(), BusyBehaviour::Cancel);
    assert!(q.is_empty());

    Ok(())
}

#[test]
fn busy_behaviour_parses_from_str() -> TestResult {
    assert_eq!(BusyBehaviour::from_str("queue")?, BusyBehaviour::Queue);
    assert_eq!(BusyBehaviour::from_str(" Cancel ")?, BusyBehaviour::Cancel);
    assert!(BusyBehaviour::from_str("restart").is_err());
    Ok(())
}

#[test]
fn queue_mode_merges_triggers_into_single_batch() -> TestResult {
    let mut q = PendingRuns::new(BusyBehaviour::Queue, 2);

    q.record("python");
    q.record("scripts");
    q.record("python");

    let batch = q.take_all();
    assert_eq!(batch, vec!["python".to_string(), "scripts".to_string()]);
    assert!(q.is_empty());

    Ok(())
}

#[test]
fn cancel_mode_keeps_only_latest_trigger() -> TestResult {
    let mut q = PendingRuns::new(BusyBehaviour::Cancel, 3);

    q.record("python");
    q.record("scripts");

    let batch = q.take_all();
    assert_eq!(batch, vec!["scripts".to_string()]);

    Ok(())
}
