// src/exec/command.rs

use std::io::ErrorKind;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::engine::{RuntimeEvent, ScheduledCommand, TaskOutcome};
use crate::errors::WatchrunError;

/// Spawn the background executor loop.
///
/// The returned `mpsc::Sender<ScheduledCommand>` is what the runtime uses
/// through `RealExecutorBackend`. Commands are executed strictly one at a
/// time: the loop awaits each process before taking the next command off
/// the channel.
pub fn spawn_executor(runtime_tx: mpsc::Sender<RuntimeEvent>) -> mpsc::Sender<ScheduledCommand> {
    let (tx, mut rx) = mpsc::channel::<ScheduledCommand>(32);

    tokio::spawn(async move {
        info!("executor loop started");
        while let Some(command) = rx.recv().await {
            run_command(command, &runtime_tx).await;
        }
        info!("executor loop finished (channel closed)");
    });

    tx
}

/// Run a single command process, forwarding stdout/stderr to the terminal
/// and emitting `TaskCompleted` on success/failure.
///
/// All errors are converted into a failed completion event; they are also
/// logged via `tracing::error!`. A failure here never takes down the
/// executor loop.
async fn run_command(command: ScheduledCommand, runtime_tx: &mpsc::Sender<RuntimeEvent>) {
    let task = command.task.clone();
    match run_command_inner(command).await {
        Ok(outcome) => {
            let _ = runtime_tx
                .send(RuntimeEvent::TaskCompleted { task, outcome })
                .await;
        }
        Err(err) => {
            error!(task = %task, error = %err, "command execution error");
            let _ = runtime_tx
                .send(RuntimeEvent::TaskCompleted {
                    task,
                    outcome: TaskOutcome::Failed(-1),
                })
                .await;
        }
    }
}

async fn run_command_inner(command: ScheduledCommand) -> Result<TaskOutcome> {
    info!(task = %command.task, cmd = %command.cmd, "starting command process");

    // Build a shell command appropriate for the platform.
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&command.cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&command.cmd);
        c
    };

    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            // The shell itself was missing. Report like a shell would and
            // keep the watch loop alive.
            let err = WatchrunError::CommandNotFound(command.cmd.clone());
            error!(task = %command.task, error = %err, "command not found");
            return Ok(TaskOutcome::Failed(127));
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("spawning process for task '{}'", command.task))
        }
    };

    // Relay child output to our own stdout/stderr, line by line. Output is
    // forwarded verbatim, never parsed.
    let out_handle = child.stdout.take().map(|stdout| -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                println!("{line}");
            }
        })
    });

    let err_handle = child.stderr.take().map(|stderr| -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                eprintln!("{line}");
            }
        })
    });

    // Wait for the child to exit, then drain the relay tasks so the output
    // of consecutive runs doesn't interleave.
    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of task '{}'", command.task))?;

    if let Some(handle) = out_handle {
        let _ = handle.await;
    }
    if let Some(handle) = err_handle {
        let _ = handle.await;
    }

    let code = status.code().unwrap_or(-1);
    let outcome = if status.success() {
        TaskOutcome::Success
    } else {
        TaskOutcome::Failed(code)
    };

    info!(
        task = %command.task,
        exit_code = code,
        success = status.success(),
        "command process exited"
    );

    Ok(outcome)
}
