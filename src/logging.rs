use crate::config::log_dir;
use crate::error::AppError;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "llm-monitor.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Sends events to `<home>/logs/llm-monitor.log` while the TUI owns the
/// terminal. Keep the guard alive until exit or buffered lines are lost.
pub fn init_file_logging() -> Result<WorkerGuard, AppError> {
    let dir = log_dir()?;
    fs::create_dir_all(&dir)?;
    let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}

pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}
