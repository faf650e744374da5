// src/config/validate.rs

use crate::config::model::ConfigFile;
use crate::errors::{Result, WatchrunError};

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - there is at least one watch group
/// - every group has non-empty `files` and `tasks`
/// - every task name referenced by a group exists in the task registry
/// - every task has a non-empty `cmd`
/// - `queue_length >= 1`
///
/// It does **not**:
/// - compile glob patterns (done when building watch profiles)
/// - check that watch roots exist on disk (done at startup, against the
///   config file's directory)
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    ensure_has_watches(cfg)?;
    validate_global_config(cfg)?;
    validate_watch_groups(cfg)?;
    validate_tasks(cfg)?;
    Ok(())
}

fn ensure_has_watches(cfg: &ConfigFile) -> Result<()> {
    if cfg.watch.is_empty() {
        return Err(WatchrunError::ConfigError(
            "config must contain at least one [watch.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_global_config(cfg: &ConfigFile) -> Result<()> {
    if cfg.config.queue_length == 0 {
        return Err(WatchrunError::ConfigError(
            "[config].queue_length must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_watch_groups(cfg: &ConfigFile) -> Result<()> {
    for (name, watch) in cfg.watch.iter() {
        if watch.files.is_empty() {
            return Err(WatchrunError::ConfigError(format!(
                "watch '{name}' has an empty `files` list"
            )));
        }
        if watch.tasks.is_empty() {
            return Err(WatchrunError::ConfigError(format!(
                "watch '{name}' has an empty `tasks` list"
            )));
        }
        for task in watch.tasks.iter() {
            if !cfg.task.contains_key(task) {
                return Err(WatchrunError::ConfigError(format!(
                    "watch '{name}' references unknown task '{task}'"
                )));
            }
        }
    }
    Ok(())
}

fn validate_tasks(cfg: &ConfigFile) -> Result<()> {
    for (name, task) in cfg.task.iter() {
        if task.cmd.trim().is_empty() {
            return Err(WatchrunError::ConfigError(format!(
                "task '{name}' has an empty `cmd`"
            )));
        }
    }
    Ok(())
}
