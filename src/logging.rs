use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Keeps the file writer alive; drop it last so buffered lines are flushed
pub struct LoggingGuard {
    pub log_file: PathBuf,
    _file_guard: WorkerGuard,
}

/// `indexing_<YYYYMMDD_HHMMSS>.log`
pub fn log_file_name(now: &DateTime<Local>) -> String {
    format!("indexing_{}.log", now.format("%Y%m%d_%H%M%S"))
}

/// Create `log_dir` if needed and open this process's log file
pub fn open_log_file(log_dir: &Path, now: &DateTime<Local>) -> Result<(File, PathBuf)> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let path = log_dir.join(log_file_name(now));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;
    Ok((file, path))
}

/// Log to stderr and to a timestamped file under `log_dir`.
/// Level comes from `RUST_LOG`, default `info`.
pub fn init_logging(log_dir: &Path) -> Result<LoggingGuard> {
    let (file, log_file) = open_log_file(log_dir, &Local::now())?;
    let (non_blocking, file_guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(LoggingGuard {
        log_file,
        _file_guard: file_guard,
    })
}
