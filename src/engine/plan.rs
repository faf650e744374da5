// src/engine/plan.rs

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::config::model::ConfigFile;
use crate::errors::{Result, WatchrunError};
use crate::types::{TaskName, WatchName};

/// Description of a command the runtime wants the executor to run now.
#[derive(Debug, Clone)]
pub struct ScheduledCommand {
    pub task: TaskName,
    pub cmd: String,
}

/// Resolves triggered watch groups to the ordered command list for one run.
///
/// Built once from the validated config and held immutably; it has no
/// per-run state.
#[derive(Debug, Clone)]
pub struct RunPlanner {
    /// Watch name -> ordered task names.
    watches: BTreeMap<WatchName, Vec<TaskName>>,
    /// Task registry: task name -> shell command.
    tasks: BTreeMap<TaskName, String>,
}

impl RunPlanner {
    /// Construct a planner from a validated [`ConfigFile`].
    pub fn from_config(cfg: &ConfigFile) -> Self {
        let watches = cfg
            .watch
            .iter()
            .map(|(name, w)| (name.clone(), w.tasks.clone()))
            .collect();

        let tasks = cfg
            .task
            .iter()
            .map(|(name, t)| (name.clone(), t.cmd.clone()))
            .collect();

        Self { watches, tasks }
    }

    /// All configured watch names, in sorted order.
    pub fn watch_names(&self) -> Vec<WatchName> {
        self.watches.keys().cloned().collect()
    }

    /// Plan one run for a batch of triggered watch groups.
    ///
    /// Watch names resolve in sorted order and each task runs at most once
    /// per run (first occurrence wins), so a file matched by several groups
    /// still yields a single invocation of a shared task.
    pub fn plan_for_watches(&self, triggered: &[WatchName]) -> Vec<ScheduledCommand> {
        let batch: BTreeSet<&WatchName> = triggered.iter().collect();

        let mut seen: BTreeSet<&TaskName> = BTreeSet::new();
        let mut commands = Vec::new();

        for watch in batch {
            let Some(task_names) = self.watches.get(watch) else {
                warn!(watch = %watch, "trigger for unknown watch group; ignoring");
                continue;
            };

            for task in task_names {
                if !seen.insert(task) {
                    continue;
                }
                match self.tasks.get(task) {
                    Some(cmd) => commands.push(ScheduledCommand {
                        task: task.clone(),
                        cmd: cmd.clone(),
                    }),
                    // Validation rejects dangling references, so this only
                    // fires if the planner was built from an unvalidated config.
                    None => warn!(task = %task, "watch references unknown task; skipping"),
                }
            }
        }

        debug!(commands = commands.len(), "planned run");
        commands
    }

    /// Plan a run consisting of a single named task.
    pub fn plan_for_task(&self, task: &str) -> Result<ScheduledCommand> {
        match self.tasks.get(task) {
            Some(cmd) => Ok(ScheduledCommand {
                task: task.to_string(),
                cmd: cmd.clone(),
            }),
            None => Err(WatchrunError::TaskNotFound(task.to_string())),
        }
    }
}
