// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Compiling `files` / `exclude` glob patterns per watch group.
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//!
//! It does **not** know about tasks or commands; it only turns filesystem
//! changes into watch-group triggers.

pub mod patterns;
pub mod watcher;

pub use patterns::{build_watch_profiles, WatchProfile};
pub use watcher::{spawn_watcher, WatcherHandle};
