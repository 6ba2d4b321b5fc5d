//! Tracing setup. Logs append to `waybackup.log` in the XDG state dir; the
//! binary falls back to stderr when that file cannot be opened.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info,waybackup=debug,waybackup_core=debug";

/// Where log records go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

/// `~/.local/state/waybackup/waybackup.log`, creating the directory.
pub fn default_log_path() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix("waybackup")?;
    Ok(dirs.place_state_file("waybackup.log")?)
}

fn open_log(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))
}

fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber writing to `target`. Fails if the log file
/// cannot be opened or a subscriber is already installed.
pub fn init(target: &LogTarget) -> Result<()> {
    let writer = match target {
        LogTarget::File(path) => BoxMakeWriter::new(Mutex::new(open_log(path)?)),
        LogTarget::Stderr => BoxMakeWriter::new(io::stderr),
    };
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(filter_from(env.as_deref()))
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing subscriber: {}", e))
}

/// Log to the default file. Returns its path.
pub fn init_logging() -> Result<PathBuf> {
    let path = default_log_path()?;
    init(&LogTarget::File(path.clone()))?;
    tracing::info!("waybackup logging to {}", path.display());
    Ok(path)
}

/// Log to stderr; a no-op if logging is already set up.
pub fn init_logging_stderr() {
    let _ = init(&LogTarget::Stderr);
}
