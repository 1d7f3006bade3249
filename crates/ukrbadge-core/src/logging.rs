//! Logging init: append to a file under the XDG state dir, or stderr.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info,ukrbadge_core=debug";

/// `~/.local/state/ukrbadge/ukrbadge.log`
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ukrbadge")?;
    Ok(xdg_dirs.get_state_home().join("ukrbadge").join("ukrbadge.log"))
}

/// Creates the parent directory if needed and opens `path` for appending.
pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create log dir: {}", dir.display()))?;
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file: {}", path.display()))
}

fn install(writer: BoxMakeWriter) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install subscriber: {}", e))
}

/// Logs to the state-dir file and returns its path.
/// On failure (e.g. log dir unwritable) the caller should fall back to `init_logging_stderr`.
pub fn init_logging() -> Result<PathBuf> {
    let path = log_file_path()?;
    let file = open_log_file(&path)?;
    // `&File` is a writer, so every event appends through the shared handle.
    install(BoxMakeWriter::new(Arc::new(file)))?;
    tracing::info!("ukrbadge logging initialized at {}", path.display());
    Ok(path)
}

/// Logs to stderr only. A subscriber that is already installed is left in place.
pub fn init_logging_stderr() {
    let _ = install(BoxMakeWriter::new(io::stderr));
}
