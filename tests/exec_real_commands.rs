// tests/exec_real_commands.rs

//! Runs real shell commands through the executor loop.

#![cfg(unix)]

use tokio::sync::mpsc;

use watchrun::engine::{RuntimeEvent, ScheduledCommand, TaskOutcome};
use watchrun::exec::spawn_executor;
use watchrun_test_utils::{init_tracing, with_timeout};

async fn run_one(cmd: &str) -> TaskOutcome {
    let (rt_tx, mut rt_rx) = mpsc::channel::<RuntimeEvent>(8);
    let exec_tx = spawn_executor(rt_tx);

    exec_tx
        .send(ScheduledCommand {
            task: "t".to_string(),
            cmd: cmd.to_string(),
        })
        .await
        .unwrap();

    match with_timeout(rt_rx.recv()).await {
        Some(RuntimeEvent::TaskCompleted { outcome, .. }) => outcome,
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn successful_command_reports_success() {
    init_tracing();
    assert_eq!(run_one("true").await, TaskOutcome::Success);
}

#[tokio::test]
async fn failing_command_reports_its_exit_code() {
    init_tracing();
    assert_eq!(run_one("exit 3").await, TaskOutcome::Failed(3));
}

#[tokio::test]
async fn unknown_command_reports_shell_not_found_code() {
    init_tracing();
    assert_eq!(
        run_one("watchrun-no-such-command-2718").await,
        TaskOutcome::Failed(127)
    );
}

#[tokio::test]
async fn commands_complete_in_dispatch_order() {
    init_tracing();

    let (rt_tx, mut rt_rx) = mpsc::channel::<RuntimeEvent>(8);
    let exec_tx = spawn_executor(rt_tx);

    // The first command sleeps; the loop must still finish it before the
    // second one starts.
    exec_tx
        .send(ScheduledCommand {
            task: "slow".to_string(),
            cmd: "sleep 0.2".to_string(),
        })
        .await
        .unwrap();
    exec_tx
        .send(ScheduledCommand {
            task: "fast".to_string(),
            cmd: "true".to_string(),
        })
        .await
        .unwrap();

    let mut completed = Vec::new();
    for _ in 0..2 {
        match with_timeout(rt_rx.recv()).await {
            Some(RuntimeEvent::TaskCompleted { task, outcome }) => {
                assert_eq!(outcome, TaskOutcome::Success);
                completed.push(task);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    assert_eq!(completed, vec!["slow".to_string(), "fast".to_string()]);
}
