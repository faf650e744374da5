// tests/watcher_events.rs

//! End-to-end checks of the notify-based watcher against a real filesystem.

use std::error::Error;
use std::fs;
use std::time::Duration;

use tempfile::tempdir;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

use watchrun::engine::RuntimeEvent;
use watchrun::watch::{build_watch_profiles, spawn_watcher};
use watchrun_test_utils::builders::{ConfigFileBuilder, WatchConfigBuilder};
use watchrun_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn python_project_config() -> watchrun::config::ConfigFile {
    ConfigFileBuilder::new()
        .with_watch(
            "python",
            WatchConfigBuilder::new()
                .root("project")
                .file("**/*.py")
                .task("test")
                .build(),
        )
        .with_task("test", "pytest")
        .build()
}

#[tokio::test]
async fn creating_a_matching_file_triggers_the_watch() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    fs::create_dir(dir.path().join("project"))?;

    let cfg = python_project_config();
    let profiles = build_watch_profiles(dir.path(), &cfg)?;

    let (rt_tx, mut rt_rx) = mpsc::channel::<RuntimeEvent>(64);
    let _handle = spawn_watcher(profiles, rt_tx)?;

    // Give the OS watcher a moment to settle before producing events.
    sleep(Duration::from_millis(200)).await;
    fs::write(dir.path().join("project/a.py"), "print('hi')\n")?;

    let event = timeout(Duration::from_secs(5), rt_rx.recv())
        .await
        .expect("no watch event within 5 seconds")
        .expect("watcher channel closed");

    match event {
        RuntimeEvent::WatchTriggered { watch } => assert_eq!(watch, "python"),
        other => panic!("unexpected event: {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn non_matching_files_never_trigger() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    fs::create_dir(dir.path().join("project"))?;

    let cfg = python_project_config();
    let profiles = build_watch_profiles(dir.path(), &cfg)?;

    let (rt_tx, mut rt_rx) = mpsc::channel::<RuntimeEvent>(64);
    let _handle = spawn_watcher(profiles, rt_tx)?;

    sleep(Duration::from_millis(200)).await;
    fs::write(dir.path().join("project/readme.md"), "# notes\n")?;

    let result = timeout(Duration::from_millis(500), rt_rx.recv()).await;
    assert!(result.is_err(), "readme.md should not trigger the watch");

    Ok(())
}
