// src/engine/debounce.rs

use std::collections::BTreeSet;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::types::WatchName;

/// Coalesces rapid file-change triggers into a single batch.
///
/// The first trigger while the window is closed opens it and fixes a
/// deadline `window` from now; further triggers before the deadline join
/// the batch without moving it. When the deadline elapses the runtime
/// calls [`DebounceWindow::take_batch`] and dispatches one run for the
/// whole batch.
///
/// A zero-length window fires on the next loop iteration, which is what
/// one-shot mode uses to skip debouncing entirely.
#[derive(Debug)]
pub struct DebounceWindow {
    window: Duration,
    deadline: Option<Instant>,
    pending: BTreeSet<WatchName>,
}

impl DebounceWindow {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
            pending: BTreeSet::new(),
        }
    }

    /// Record a trigger for a watch group, opening the window if closed.
    pub fn note_trigger(&mut self, watch: &str) {
        if self.deadline.is_none() {
            self.deadline = Some(Instant::now() + self.window);
            debug!(watch = %watch, window = ?self.window, "debounce window opened");
        }
        self.pending.insert(watch.to_string());
    }

    /// Deadline at which the current batch should dispatch, if the window
    /// is open.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true if a batch is currently accumulating.
    pub fn is_open(&self) -> bool {
        self.deadline.is_some()
    }

    /// Close the window and return the accumulated batch, in sorted order.
    pub fn take_batch(&mut self) -> Vec<WatchName> {
        self.deadline = None;
        let batch: Vec<WatchName> = std::mem::take(&mut self.pending).into_iter().collect();
        debug!(batch = ?batch, "debounce window elapsed");
        batch
    }
}
