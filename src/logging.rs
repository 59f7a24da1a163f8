use std::path::Path;

use color_eyre::eyre::{eyre, Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "study-planner.log";

/// Route tracing output to `<log_dir>/study-planner.log`.
///
/// The terminal belongs to the TUI, so nothing is written to stdout or
/// stderr. `RUST_LOG` wins over `level`. Keep the returned guard alive for
/// the whole run or buffered lines are lost.
pub fn init(log_dir: &Path, level: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .wrap_err_with(|| format!("failed to create log directory {}", log_dir.display()))?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).wrap_err_with(|| format!("invalid log level `{level}`"))?,
    };

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| eyre!("failed to install tracing subscriber: {err}"))?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        log_dir = %log_dir.display(),
        "logging initialized"
    );
    Ok(guard)
}
