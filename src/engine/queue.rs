// src/engine/queue.rs

use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, warn};

use crate::types::{BusyBehaviour, WatchName};

/// Triggers that arrived while a run was already executing.
///
/// Semantics:
/// - Each queued entry is a *batch* of watch names that should dispatch as
///   one future run.
/// - `queue_length` bounds how many batches are remembered; the default of
///   1 means "at most one follow-up run is queued".
/// - When the current run finishes, the runtime calls
///   [`PendingRuns::take_all`], which merges every queued batch into a
///   single batch for the next run.
#[derive(Debug)]
pub struct PendingRuns {
    behaviour: BusyBehaviour,
    max_runs: usize,
    runs: VecDeque<BTreeSet<WatchName>>,
}

impl PendingRuns {
    /// Create a new queue with the given behaviour and maximum queued runs.
    ///
    /// `max_runs` is clamped to at least 1; a zero-length queue would make
    /// queuing semantics meaningless.
    pub fn new(behaviour: BusyBehaviour, max_runs: usize) -> Self {
        Self {
            behaviour,
            max_runs: max_runs.max(1),
            runs: VecDeque::new(),
        }
    }

    /// Returns true if there are no queued triggers.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Returns the configured behaviour.
    pub fn behaviour(&self) -> BusyBehaviour {
        self.behaviour
    }

    /// Record that a watch group triggered while a run is in progress.
    ///
    /// - `Queue`: merge the trigger into the newest batch (creating one if
    ///   none exists), then drop the oldest batches beyond `max_runs`.
    /// - `Cancel`: drop all queued batches and keep only this trigger.
    pub fn record(&mut self, watch: &str) {
        let name = watch.to_string();

        match self.behaviour {
            BusyBehaviour::Queue => {
                if let Some(last_batch) = self.runs.back_mut() {
                    let inserted = last_batch.insert(name.clone());
                    debug!(watch = %name, inserted, "merged trigger into queued batch");
                } else {
                    self.runs.push_back(BTreeSet::from([name.clone()]));
                    debug!(watch = %name, "created queued batch");
                }

                if self.runs.len() > self.max_runs {
                    warn!(
                        batches = self.runs.len(),
                        max_runs = self.max_runs,
                        "exceeded queue length; dropping oldest queued batches"
                    );
                    while self.runs.len() > self.max_runs {
                        self.runs.pop_front();
                    }
                }
            }
            BusyBehaviour::Cancel => {
                debug!(watch = %name, "replacing queued batches with latest trigger");
                self.runs.clear();
                self.runs.push_back(BTreeSet::from([name]));
            }
        }
    }

    /// Drain all queued batches, merged into a single sorted batch for the
    /// next run.
    pub fn take_all(&mut self) -> Vec<WatchName> {
        let mut merged: BTreeSet<WatchName> = BTreeSet::new();

        while let Some(batch) = self.runs.pop_front() {
            merged.extend(batch);
        }

        let batch: Vec<WatchName> = merged.into_iter().collect();
        debug!(drained = batch.len(), "drained queued triggers into next run");
        batch
    }
}
