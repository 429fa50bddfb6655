use std::str::FromStr;

use anyhow::{Result, anyhow};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;

use crate::config::Config;

/// Install the global subscriber writing to a daily rolling file.
///
/// Keep the returned guard alive for as long as logs should be flushed.
pub fn init_logging(config: &Config) -> Result<WorkerGuard> {
    let level = Level::from_str(&config.log_level)
        .map_err(|_| anyhow!("LOG_LEVEL '{}' is not a tracing level", config.log_level))?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "leave-advisor.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))?;

    tracing::info!(log_dir = %config.log_dir.display(), %level, "logging initialised");
    Ok(guard)
}
