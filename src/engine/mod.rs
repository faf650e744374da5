// src/engine/mod.rs

//! Orchestration engine for watchrun.
//!
//! This module ties together:
//! - the run planner (watch names -> ordered commands)
//! - the debounce window that coalesces rapid file events
//! - the pending-run queue (what happens when triggers arrive mid-run)
//! - the main runtime event loop that reacts to:
//!   - file-watch triggers
//!   - task completion events
//!   - shutdown signals

pub mod debounce;
pub mod plan;
pub mod queue;
pub mod runtime;

pub use debounce::DebounceWindow;
pub use plan::{RunPlanner, ScheduledCommand};
pub use queue::PendingRuns;
pub use runtime::{Runtime, RuntimeEvent, RuntimeOptions, TaskOutcome};
