// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::BusyBehaviour;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [config]
/// debounce_ms = 300
/// triggered_while_running = "queue"
///
/// [watch.python]
/// root = "battdeg"
/// files = ["**/*.py"]
/// tasks = ["test"]
///
/// [task.test]
/// cmd = "pytest"
/// ```
///
/// The `[config]` section is optional and has reasonable defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// Global behaviour config from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// All watch groups from `[watch.<name>]`.
    ///
    /// Keys are the *watch names* (e.g. `"python"`, `"scripts"`).
    #[serde(default)]
    pub watch: BTreeMap<String, WatchConfig>,

    /// The task registry from `[task.<name>]`.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Coalescing window for file events, in milliseconds.
    ///
    /// Rapid changes within one window dispatch as a single run.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// `"queue"` or `"cancel"`: what to do with triggers that arrive while
    /// a run is already executing.
    #[serde(default)]
    pub triggered_while_running: BusyBehaviour,

    /// Maximum number of queued pending runs to remember.
    #[serde(default = "default_queue_length")]
    pub queue_length: usize,
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_queue_length() -> usize {
    1
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            triggered_while_running: BusyBehaviour::default(),
            queue_length: default_queue_length(),
        }
    }
}

/// `[watch.<name>]` section.
///
/// A watch group observes one directory tree and names the tasks to run
/// when a matching file changes.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    /// Directory to watch, relative to the config file.
    ///
    /// If `None`, the directory containing the config file is watched.
    #[serde(default)]
    pub root: Option<String>,

    /// Glob patterns matched against paths relative to `root`.
    pub files: Vec<String>,

    /// Glob patterns that veto a match.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Ordered list of task names to run when this group triggers.
    pub tasks: Vec<String>,
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// The shell command to execute.
    pub cmd: String,
}
