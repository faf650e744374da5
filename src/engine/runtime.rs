// src/engine/runtime.rs

use std::collections::VecDeque;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time;
use tracing::{debug, info, warn};

use crate::engine::debounce::DebounceWindow;
use crate::engine::plan::{RunPlanner, ScheduledCommand};
use crate::engine::queue::PendingRuns;
use crate::exec::ExecutorBackend;
use crate::types::{TaskName, WatchName};

/// Result of a task process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    Failed(i32), // exit code
}

/// Events sent into the runtime from watchers, the executor, or external
/// signals.
///
/// - the watcher sends `WatchTriggered`
/// - the executor sends `TaskCompleted`
/// - Ctrl-C handling sends `ShutdownRequested`
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    WatchTriggered { watch: WatchName },
    TaskCompleted { task: TaskName, outcome: TaskOutcome },
    ShutdownRequested,
}

/// Options that influence how the runtime behaves.
#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    /// If true, exit as soon as nothing is running, queued, or debouncing.
    /// In watch mode this should be `false`.
    pub exit_when_idle: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            exit_when_idle: false,
        }
    }
}

/// The run currently executing: the dispatched task plus the rest of its
/// ordered command sequence.
#[derive(Debug)]
struct ActiveRun {
    current: TaskName,
    remaining: VecDeque<ScheduledCommand>,
}

/// What the event loop should do next after waiting.
enum LoopStep {
    WindowElapsed,
    Event(Option<RuntimeEvent>),
}

/// The main orchestration runtime.
///
/// Responsibilities:
/// - Consume `RuntimeEvent`s from the watcher / executor / ctrl-c handler.
/// - Coalesce rapid triggers through the debounce window.
/// - Keep execution serialized: exactly one command process at a time, the
///   next dispatching only after the previous one's completion event.
/// - Apply queue semantics for triggers arriving mid-run.
pub struct Runtime<E: ExecutorBackend> {
    planner: RunPlanner,
    debounce: DebounceWindow,
    pending: PendingRuns,
    options: RuntimeOptions,

    /// Unified event stream from all producers.
    events_rx: mpsc::Receiver<RuntimeEvent>,

    /// Executor backend that actually runs commands.
    executor: E,

    /// Currently executing run, if any.
    active: Option<ActiveRun>,

    /// Commands to run before processing any events (one-shot mode).
    initial: Option<Vec<ScheduledCommand>>,
}

impl<E: ExecutorBackend> Runtime<E> {
    pub fn new(
        planner: RunPlanner,
        debounce: DebounceWindow,
        pending: PendingRuns,
        options: RuntimeOptions,
        events_rx: mpsc::Receiver<RuntimeEvent>,
        executor: E,
    ) -> Self {
        Self {
            planner,
            debounce,
            pending,
            options,
            events_rx,
            executor,
            active: None,
            initial: None,
        }
    }

    /// Queue a command sequence to dispatch at startup, before any file
    /// events are processed. Used by `--once` and `--task`.
    pub fn with_initial_run(mut self, commands: Vec<ScheduledCommand>) -> Self {
        self.initial = Some(commands);
        self
    }

    /// Main event loop.
    ///
    /// This should be called from `lib.rs` after config is loaded and the
    /// watcher and executor have been given a clone of the
    /// `mpsc::Sender<RuntimeEvent>`.
    pub async fn run(mut self) -> Result<()> {
        info!("watchrun runtime started");

        if let Some(commands) = self.initial.take() {
            self.start_run(commands).await?;
        }

        if self.options.exit_when_idle && self.is_idle() {
            info!("nothing to run, exiting");
            return Ok(());
        }

        loop {
            let step = if let Some(deadline) = self.debounce.deadline() {
                tokio::select! {
                    _ = time::sleep_until(deadline) => LoopStep::WindowElapsed,
                    event = self.events_rx.recv() => LoopStep::Event(event),
                }
            } else {
                LoopStep::Event(self.events_rx.recv().await)
            };

            match step {
                LoopStep::WindowElapsed => {
                    let batch = self.debounce.take_batch();
                    let commands = self.planner.plan_for_watches(&batch);
                    self.start_run(commands).await?;
                }
                LoopStep::Event(None) => {
                    debug!("event channel closed, stopping runtime");
                    break;
                }
                LoopStep::Event(Some(event)) => {
                    debug!(?event, "runtime received event");
                    if !self.handle_event(event).await? {
                        break;
                    }
                }
            }
        }

        info!("watchrun runtime exiting");
        Ok(())
    }

    fn is_idle(&self) -> bool {
        self.active.is_none() && self.pending.is_empty() && !self.debounce.is_open()
    }

    /// Returns `Ok(false)` when the loop should stop.
    async fn handle_event(&mut self, event: RuntimeEvent) -> Result<bool> {
        match event {
            RuntimeEvent::WatchTriggered { watch } => {
                self.handle_trigger(watch);
                Ok(true)
            }
            RuntimeEvent::TaskCompleted { task, outcome } => {
                self.handle_completion(task, outcome).await
            }
            RuntimeEvent::ShutdownRequested => {
                info!("shutdown requested, stopping runtime");
                Ok(false)
            }
        }
    }

    /// Handle a file-change trigger for a watch group.
    ///
    /// While a run is active the trigger is recorded for later; otherwise it
    /// joins (or opens) the debounce window.
    fn handle_trigger(&mut self, watch: WatchName) {
        info!(watch = %watch, "watch triggered");

        if self.active.is_some() {
            self.pending.record(&watch);
            debug!(watch = %watch, "trigger recorded for after the current run");
        } else {
            self.debounce.note_trigger(&watch);
        }
    }

    /// Handle completion of a command process.
    ///
    /// Success dispatches the next command of the run; failure is reported
    /// and aborts the rest of the sequence, but never the watch loop.
    async fn handle_completion(&mut self, task: TaskName, outcome: TaskOutcome) -> Result<bool> {
        let Some(mut active) = self.active.take() else {
            warn!(task = %task, "completion event with no active run; ignoring");
            return Ok(true);
        };

        if task != active.current {
            warn!(
                task = %task,
                expected = %active.current,
                "completion event for unexpected task"
            );
        }

        match outcome {
            TaskOutcome::Success => info!(task = %task, "task completed successfully"),
            TaskOutcome::Failed(code) => {
                warn!(task = %task, exit_code = code, "task failed");
                if !active.remaining.is_empty() {
                    warn!(
                        skipped = active.remaining.len(),
                        "skipping remaining tasks of this run"
                    );
                    active.remaining.clear();
                }
            }
        }

        if let Some(next) = active.remaining.pop_front() {
            debug!(task = %next.task, "dispatching next task in run");
            active.current = next.task.clone();
            self.executor.dispatch(next).await?;
            self.active = Some(active);
            return Ok(true);
        }

        info!("run finished");

        // Triggers that arrived mid-run start the next run immediately;
        // they already waited at least one full command.
        if !self.pending.is_empty() {
            let batch = self.pending.take_all();
            let commands = self.planner.plan_for_watches(&batch);
            self.start_run(commands).await?;
            return Ok(true);
        }

        if self.options.exit_when_idle && self.is_idle() {
            info!("runtime idle and exit_when_idle=true, stopping");
            return Ok(false);
        }

        Ok(true)
    }

    /// Dispatch the first command of a new run and remember the rest.
    async fn start_run(&mut self, commands: Vec<ScheduledCommand>) -> Result<()> {
        let mut queue: VecDeque<ScheduledCommand> = commands.into();

        let Some(first) = queue.pop_front() else {
            debug!("empty run plan; nothing to do");
            return Ok(());
        };

        info!(task = %first.task, queued = queue.len(), "starting run");

        self.active = Some(ActiveRun {
            current: first.task.clone(),
            remaining: queue,
        });
        self.executor.dispatch(first).await?;

        Ok(())
    }
}
