// src/watch/patterns.rs

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::config::model::ConfigFile;
use crate::errors::{Result, WatchrunError};
use crate::types::{TaskName, WatchName};

/// Compiled watch/exclude glob patterns for a single watch group.
///
/// Patterns are matched against paths relative to the group's `root`
/// directory. The watcher passes absolute event paths into
/// [`WatchProfile::matches_path`].
#[derive(Clone)]
pub struct WatchProfile {
    name: WatchName,
    root: PathBuf,
    tasks: Vec<TaskName>,
    files_set: GlobSet,
    exclude_set: Option<GlobSet>,
}

impl fmt::Debug for WatchProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchProfile")
            .field("name", &self.name)
            .field("root", &self.root)
            .field("tasks", &self.tasks)
            .finish_non_exhaustive()
    }
}

impl WatchProfile {
    /// Name of the watch group this profile belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute directory this profile observes.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ordered task names to run when this profile triggers.
    pub fn tasks(&self) -> &[TaskName] {
        &self.tasks
    }

    /// Returns true if the given absolute path is under this profile's root
    /// and its relative form matches `files` without matching `exclude`.
    pub fn matches_path(&self, abs: &Path) -> bool {
        match relative_str(&self.root, abs) {
            Some(rel) => self.matches_rel(&rel),
            None => false,
        }
    }

    /// Match a path already relative to the profile root, e.g. `"pkg/deg.py"`.
    pub fn matches_rel(&self, rel_path: &str) -> bool {
        if !self.files_set.is_match(rel_path) {
            return false;
        }
        if let Some(exclude) = &self.exclude_set {
            if exclude.is_match(rel_path) {
                return false;
            }
        }
        true
    }
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Returns `None` if the path is not under `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let s = rel.to_string_lossy().replace('\\', "/");
    Some(s)
}

/// Build a compiled watch profile for each `[watch.<name>]` group.
///
/// `base_dir` is the directory containing the config file; each group's
/// `root` is resolved against it. A root that does not exist on disk is a
/// fatal startup error.
pub fn build_watch_profiles(base_dir: &Path, cfg: &ConfigFile) -> Result<Vec<WatchProfile>> {
    let mut profiles = Vec::with_capacity(cfg.watch.len());

    for (name, watch) in cfg.watch.iter() {
        let root = match &watch.root {
            Some(rel) => base_dir.join(rel),
            None => base_dir.to_path_buf(),
        };

        if !root.is_dir() {
            return Err(WatchrunError::MissingWatchRoot(root));
        }

        // Canonicalize once so event paths relativize against a stable base.
        let root = root.canonicalize().unwrap_or(root);

        let files_set = build_globset(&watch.files)
            .with_context(|| format!("building files globset for watch '{name}'"))?;

        let exclude_set = if watch.exclude.is_empty() {
            None
        } else {
            Some(
                build_globset(&watch.exclude)
                    .with_context(|| format!("building exclude globset for watch '{name}'"))?,
            )
        };

        profiles.push(WatchProfile {
            name: name.clone(),
            root,
            tasks: watch.tasks.clone(),
            files_set,
            exclude_set,
        });
    }

    Ok(profiles)
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
