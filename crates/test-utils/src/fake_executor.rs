use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use watchrun::engine::{RuntimeEvent, ScheduledCommand, TaskOutcome};
use watchrun::errors::Result;
use watchrun::exec::ExecutorBackend;

/// A fake executor that:
/// - records which tasks were "run"
/// - immediately reports a `TaskCompleted` for each dispatched command,
///   `Success` unless an outcome override was registered.
pub struct FakeExecutor {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    executed: Arc<Mutex<Vec<String>>>,
    outcomes: HashMap<String, TaskOutcome>,
}

impl FakeExecutor {
    pub fn new(
        runtime_tx: mpsc::Sender<RuntimeEvent>,
        executed: Arc<Mutex<Vec<String>>>,
    ) -> Self {
        Self {
            runtime_tx,
            executed,
            outcomes: HashMap::new(),
        }
    }

    /// Make the given task report this outcome instead of `Success`.
    pub fn with_outcome(mut self, task: &str, outcome: TaskOutcome) -> Self {
        self.outcomes.insert(task.to_string(), outcome);
        self
    }
}

impl ExecutorBackend for FakeExecutor {
    fn dispatch(
        &mut self,
        command: ScheduledCommand,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let executed = Arc::clone(&self.executed);
        let outcome = self
            .outcomes
            .get(&command.task)
            .copied()
            .unwrap_or(TaskOutcome::Success);

        Box::pin(async move {
            {
                let mut guard = executed.lock().unwrap();
                guard.push(command.task.clone());
            }

            tx.send(RuntimeEvent::TaskCompleted {
                task: command.task,
                outcome,
            })
            .await
            .map_err(anyhow::Error::from)?;
            Ok(())
        })
    }
}

/// An executor that only records dispatches; the test decides when (and
/// with what outcome) each command completes, by sending `TaskCompleted`
/// into the runtime channel itself.
///
/// This makes serialization observable: a command is "running" from the
/// moment it appears on the dispatch channel until the test completes it.
pub struct ManualExecutor {
    dispatched_tx: mpsc::UnboundedSender<ScheduledCommand>,
}

impl ManualExecutor {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ScheduledCommand>) {
        let (dispatched_tx, dispatched_rx) = mpsc::unbounded_channel();
        (Self { dispatched_tx }, dispatched_rx)
    }
}

impl ExecutorBackend for ManualExecutor {
    fn dispatch(
        &mut self,
        command: ScheduledCommand,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.dispatched_tx.clone();

        Box::pin(async move {
            tx.send(command).map_err(anyhow::Error::from)?;
            Ok(())
        })
    }
}
