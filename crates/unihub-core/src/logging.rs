use std::path::PathBuf;

use anyhow::Context;
use directories::BaseDirs;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const LOG_ENV_VAR: &str = "UNIHUB_LOG";
const LOG_FILE_PREFIX: &str = "unihub.log";

/// Installs the global subscriber.
///
/// Logs go to a daily rolling file under the platform data directory
/// (`~/.local/share/unihub/logs` on Linux). The filter comes from
/// `UNIHUB_LOG` and defaults to `info`.
pub fn init() -> anyhow::Result<PathBuf> {
    let log_dir = log_directory()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .try_init()
        .context("failed to install tracing subscriber")?;

    tracing::info!(log_dir = %log_dir.display(), "unihub starting");
    Ok(log_dir)
}

pub fn log_directory() -> anyhow::Result<PathBuf> {
    let base_dirs = BaseDirs::new().context("could not resolve home directory for log path")?;
    Ok(base_dirs.data_local_dir().join("unihub").join("logs"))
}
