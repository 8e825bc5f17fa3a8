use std::error::Error;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;

/// Sets up file logging for one of the binaries.
///
/// The terminal belongs to the menus and tables, so records only go to a
/// daily rolling file named after `prefix` inside the configured log
/// directory. Keep the returned guard alive until `main` returns or buffered
/// records are lost.
pub fn init(settings: &Settings, prefix: &str) -> Result<WorkerGuard, Box<dyn Error + Send + Sync>> {
    let log_path = settings.log_directory();
    std::fs::create_dir_all(&log_path)?;

    let file_appender = tracing_appender::rolling::RollingFileAppender::new(
        tracing_appender::rolling::Rotation::DAILY,
        &log_path,
        prefix,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_new(settings.logging.level.to_lowercase())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        // Disable ANSI colors for cleaner log files
        .with_ansi(false)
        .with_line_number(true)
        .with_file(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_target(false)
        .with_env_filter(filter)
        .try_init()?;

    let full_log_path = std::fs::canonicalize(&log_path).unwrap_or(log_path);
    info!("{} starting up, logging to {}", prefix, full_log_path.display());

    Ok(guard)
}
