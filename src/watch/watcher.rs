// src/watch/watcher.rs

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::RuntimeEvent;
use crate::errors::Result;
use crate::watch::patterns::WatchProfile;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive
/// for as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher over every distinct profile root and send
/// `RuntimeEvent::WatchTriggered` for groups whose patterns match a changed
/// path.
///
/// - `profiles` is the compiled per-group pattern set.
/// - `runtime_tx` is the channel into the main runtime.
///
/// Failure to establish any watch (e.g. permission denied) is returned as an
/// error; callers treat it as fatal.
pub fn spawn_watcher(
    profiles: Vec<WatchProfile>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let profiles = Arc::new(profiles);

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel::<Event>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        {
            let event_tx = event_tx.clone();
            move |res: notify::Result<Event>| {
                match res {
                    Ok(event) => {
                        if let Err(err) = event_tx.send(event) {
                            // We can't log via tracing here easily, so fallback to stderr.
                            eprintln!("watchrun: failed to forward notify event: {err}");
                        }
                    }
                    Err(err) => {
                        eprintln!("watchrun: file watch error: {err}");
                    }
                }
            }
        },
        Config::default(),
    )
    .map_err(anyhow::Error::from)?;

    let roots: BTreeSet<PathBuf> = profiles.iter().map(|p| p.root().to_path_buf()).collect();
    for root in &roots {
        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(anyhow::Error::from)?;
        info!("file watcher started on {:?}", root);
    }

    // Async task that consumes notify events and forwards group triggers to
    // the runtime.
    let async_profiles = Arc::clone(&profiles);
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!("received notify event: {:?}", event);

            // Only create/modify/remove count as changes; access events on
            // platforms that report them would retrigger runs endlessly.
            if !(event.kind.is_create() || event.kind.is_modify() || event.kind.is_remove()) {
                continue;
            }

            for path in &event.paths {
                for profile in async_profiles.iter() {
                    if profile.matches_path(path) {
                        let watch_name = profile.name().to_string();
                        debug!(
                            watch = %watch_name,
                            path = ?path,
                            "watch match -> triggering"
                        );
                        if let Err(err) = runtime_tx
                            .send(RuntimeEvent::WatchTriggered { watch: watch_name })
                            .await
                        {
                            warn!("failed to send RuntimeEvent::WatchTriggered: {err}");
                            // If the runtime channel is closed, there's no
                            // point keeping the watcher loop alive.
                            return;
                        }
                    }
                }
            }
        }

        debug!("file watcher loop ended");
    });

    Ok(WatcherHandle { _inner: watcher })
}
