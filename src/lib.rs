// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::engine::{
    DebounceWindow, PendingRuns, RunPlanner, Runtime, RuntimeEvent, RuntimeOptions,
};
use crate::exec::RealExecutorBackend;
use crate::watch::build_watch_profiles;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - planner / debounce / pending-run queue / runtime
/// - executor
/// - (optional) file watcher
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let base_dir = config_root_dir(&config_path);

    // Resolve watch roots up front so a missing directory fails before any
    // loop starts, in one-shot mode too.
    let profiles = build_watch_profiles(&base_dir, &cfg)?;

    let planner = RunPlanner::from_config(&cfg);

    // One-shot runs skip the coalescing window.
    let once = args.once || args.task.is_some();
    let window = if once {
        Duration::ZERO
    } else {
        Duration::from_millis(cfg.config.debounce_ms)
    };
    let debounce = DebounceWindow::new(window);
    let pending = PendingRuns::new(cfg.config.triggered_while_running, cfg.config.queue_length);

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    // Process executor backend (real implementation in production).
    let executor = RealExecutorBackend::new(rt_tx.clone());

    // Optional file watcher (disabled in one-shot mode).
    let _watcher_handle = if !once {
        Some(crate::watch::spawn_watcher(profiles, rt_tx.clone())?)
    } else {
        None
    };

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    // One-shot work: a single named task, or every watch group's sequence.
    let initial = if let Some(task) = &args.task {
        vec![planner.plan_for_task(task)?]
    } else if args.once {
        planner.plan_for_watches(&planner.watch_names())
    } else {
        Vec::new()
    };

    let options = RuntimeOptions {
        exit_when_idle: once,
    };

    let mut runtime = Runtime::new(planner, debounce, pending, options, rt_rx, executor);
    if !initial.is_empty() {
        runtime = runtime.with_initial_run(initial);
    }
    runtime.run().await
}

/// Figure out the project base directory for watching.
///
/// - If the config path has a non-empty parent (e.g. "configs/Watchrun.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Watchrun.toml" (parent = ""),
///   we fall back to the current working directory.
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Simple dry-run output: print watch groups and tasks.
fn print_dry_run(cfg: &ConfigFile) {
    println!("watchrun dry-run");
    println!("  config.debounce_ms = {}", cfg.config.debounce_ms);
    println!(
        "  config.triggered_while_running = {:?}",
        cfg.config.triggered_while_running
    );
    println!("  config.queue_length = {}", cfg.config.queue_length);
    println!();

    println!("watches ({}):", cfg.watch.len());
    for (name, watch) in cfg.watch.iter() {
        println!("  - {name}");
        if let Some(ref root) = watch.root {
            println!("      root: {root}");
        }
        println!("      files: {:?}", watch.files);
        if !watch.exclude.is_empty() {
            println!("      exclude: {:?}", watch.exclude);
        }
        println!("      tasks: {:?}", watch.tasks);
    }

    println!("tasks ({}):", cfg.task.len());
    for (name, task) in cfg.task.iter() {
        println!("  - {name}");
        println!("      cmd: {}", task.cmd);
    }

    debug!("dry-run complete (no execution)");
}
