//! Structured logging with JSON output.
//!
//! Logs are emitted through `tracing`, formatted as JSON and written to a
//! per-run file by a non-blocking `tracing_appender` worker, so the host's
//! update tick never waits on disk I/O.
//!
//! Each run gets a UUID v7 run ID used in the file name
//! (`crumbs-<run_id>.json`). Because v7 IDs are time-ordered, sorting the
//! file names sorts the runs chronologically, which is what retention
//! relies on.
//!
//! The level comes from `LoggingSettings::level` unless `RUST_LOG` is set:
//!
//! ```bash
//! RUST_LOG=crumbs_core::navigation=trace,info ./crumbs-emulator
//! ```
//!
//! ```no_run
//! use crumbs_core::settings::LoggingSettings;
//! use crumbs_core::logging::{init_logging, shutdown_logging};
//!
//! init_logging(&LoggingSettings::default())?;
//! tracing::info!("host started");
//! shutdown_logging();
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::settings::LoggingSettings;
use anyhow::{Context, Error};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::{Mutex, OnceLock};
use std::thread;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const LOG_FILE_PREFIX: &str = "crumbs-";
const LOG_FILE_SUFFIX: &str = "json";
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

static LOG_GUARD: OnceLock<Mutex<Option<WorkerGuard>>> = OnceLock::new();
static RUN_ID: OnceLock<String> = OnceLock::new();

/// Returns the run ID of this process, generating it on first use.
///
/// ```
/// use crumbs_core::logging::get_run_id;
///
/// assert_eq!(get_run_id(), get_run_id());
/// ```
pub fn get_run_id() -> &'static str {
    RUN_ID.get_or_init(|| Uuid::now_v7().to_string()).as_str()
}

/// Run logs in `log_dir`, oldest first.
fn run_log_paths(log_dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut paths = fs::read_dir(log_dir)
        .with_context(|| format!("can't read log directory {}", log_dir.display()))?
        .map(|entry| {
            entry
                .map(|entry| entry.path())
                .context("can't read log directory entry")
        })
        .filter(|path| path.as_ref().map_or(true, |path| is_run_log(path)))
        .collect::<Result<Vec<_>, _>>()?;

    paths.sort();

    Ok(paths)
}

fn is_run_log(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };

    name.starts_with(LOG_FILE_PREFIX) && name.ends_with(LOG_FILE_SUFFIX)
}

/// Deletes the oldest run logs so that at most `keep` remain, returning how
/// many were removed. `keep == 0` disables pruning.
fn prune_run_logs(log_dir: &Path, keep: usize) -> Result<usize, Error> {
    if keep == 0 {
        return Ok(0);
    }

    let paths = run_log_paths(log_dir)?;
    let excess = paths.len().saturating_sub(keep);
    for path in &paths[..excess] {
        fs::remove_file(path)
            .with_context(|| format!("can't remove old log file {}", path.display()))?;
    }

    Ok(excess)
}

/// Installs the global JSON subscriber.
///
/// Creates the log directory (relative to the working directory), applies
/// the retention limit and starts the non-blocking writer. Does nothing
/// when logging is disabled. Call once, before the first tick.
///
/// # Errors
///
/// Fails if the directory can't be created or cleaned, the level can't be
/// parsed, or a global subscriber is already installed.
pub fn init_logging(settings: &LoggingSettings) -> Result<(), Error> {
    if !settings.enabled {
        return Ok(());
    }

    let current_working_dir =
        std::env::current_dir().context("can't get current working directory")?;
    let log_dir = current_working_dir.join(&settings.directory);
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("can't create log directory {}", log_dir.display()))?;

    prune_run_logs(&log_dir, settings.max_files)?;

    let appender = tracing_appender::rolling::Builder::new()
        .rotation(tracing_appender::rolling::Rotation::NEVER)
        .filename_prefix(format!("{}{}", LOG_FILE_PREFIX, get_run_id()))
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(settings.max_files)
        .build(&log_dir)
        .context("can't initialize rolling log file appender")?;

    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(Mutex::new(Some(guard)));

    let filter = build_filter(settings)?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_ansi(false)
        .with_writer(non_blocking)
        .with_current_span(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("can't initialize tracing subscriber")?;

    eprintln!(
        "Crumbs run started with ID: {} (version {})",
        get_run_id(),
        VERSION
    );

    Ok(())
}

/// Flushes buffered log lines and stops the writer.
///
/// Waits at most five seconds for the worker to drain.
pub fn shutdown_logging() {
    let Some(mutex) = LOG_GUARD.get() else {
        return;
    };
    let Ok(mut guard_opt) = mutex.lock() else {
        return;
    };

    if let Some(guard) = guard_opt.take() {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            drop(guard);
            let _ = tx.send(());
        });

        let _ = rx.recv_timeout(SHUTDOWN_TIMEOUT);
        eprintln!("Logging shutdown complete.");
    }
}

/// `RUST_LOG` wins over the configured level; an empty level means `info`.
fn build_filter(settings: &LoggingSettings) -> Result<EnvFilter, Error> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let level = match settings.level.trim() {
        "" => "info",
        level => level,
    };

    EnvFilter::try_new(level).context("invalid logging level")
}
