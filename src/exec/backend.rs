// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The runtime talks to an `ExecutorBackend` instead of a raw mpsc sender.
//! This makes it easy to swap in a fake executor in tests while keeping the
//! production executor implementation in [`command`].

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;

use crate::engine::{RuntimeEvent, ScheduledCommand};
use crate::errors::{Error, Result};

use super::command::spawn_executor;

/// Trait abstracting how scheduled commands are executed.
///
/// Production code uses [`RealExecutorBackend`]; tests can provide their own
/// implementation that doesn't spawn real processes. The runtime dispatches
/// one command at a time and waits for its `TaskCompleted` event before
/// dispatching the next.
pub trait ExecutorBackend: Send {
    /// Dispatch one command for execution.
    ///
    /// The implementation is expected to eventually emit a
    /// `RuntimeEvent::TaskCompleted` for the command's task.
    fn dispatch(
        &mut self,
        command: ScheduledCommand,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Real executor backend used in production.
///
/// Internally, this just wraps the executor loop in [`spawn_executor`]. The
/// runtime calls `dispatch`, which forwards the command to the background
/// executor via an mpsc channel.
pub struct RealExecutorBackend {
    tx: mpsc::Sender<ScheduledCommand>,
}

impl RealExecutorBackend {
    /// Create a new real executor backend, wiring it to the given runtime
    /// event sender.
    ///
    /// This spawns the background executor loop immediately.
    pub fn new(runtime_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        let tx = spawn_executor(runtime_tx);
        Self { tx }
    }
}

impl ExecutorBackend for RealExecutorBackend {
    fn dispatch(
        &mut self,
        command: ScheduledCommand,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        // Clone the sender so the future doesn't borrow `self` across `await`.
        let tx = self.tx.clone();

        Box::pin(async move {
            tx.send(command).await.map_err(Error::from)?;
            Ok(())
        })
    }
}
