use std::str::FromStr;

use serde::Deserialize;

/// Name of a `[watch.<name>]` group.
pub type WatchName = String;

/// Name of a `[task.<name>]` entry.
pub type TaskName = String;

/// Behaviour when a watch triggers while a run is already in progress.
///
/// - `Queue`: remember the trigger and start a new run when the current one
///   finishes (default behaviour).
/// - `Cancel`: drop any previously queued run and only keep the latest
///   trigger. The running command is allowed to finish; only the queued
///   follow-up work is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusyBehaviour {
    Queue,
    Cancel,
}

impl Default for BusyBehaviour {
    fn default() -> Self {
        BusyBehaviour::Queue
    }
}

impl FromStr for BusyBehaviour {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "queue" => Ok(BusyBehaviour::Queue),
            "cancel" => Ok(BusyBehaviour::Cancel),
            other => Err(format!(
                "invalid triggered_while_running value: {other} (expected \"queue\" or \"cancel\")"
            )),
        }
    }
}
