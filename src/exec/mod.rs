// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the commands behind the
//! configured tasks, using `tokio::process::Command`, and reporting back to
//! the orchestration runtime via `RuntimeEvent`s.
//!
//! - [`command`] owns the executor loop which consumes `ScheduledCommand`s
//!   and spawns processes, one at a time.
//! - [`backend`] is the pluggable seam the runtime talks to, so tests can
//!   substitute a fake executor.

pub mod backend;
pub mod command;

pub use backend::{ExecutorBackend, RealExecutorBackend};
pub use command::spawn_executor;
