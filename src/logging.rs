//! File logging. The terminal belongs to the UI, so nothing is logged to it.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_NAME: &str = "pricewatch.log";

/// Where logs go when `--log-dir` is not given.
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("pricewatch").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Install a daily-rotated file subscriber. `RUST_LOG` overrides `level`.
pub fn init_logging(log_dir: &Path, level: &str) -> Result<()> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_NAME)
        .build(log_dir)
        .with_context(|| format!("Failed to open log file in {}", log_dir.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true),
        )
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("pricewatch={level},warn").into()),
        )
        .try_init()
        .context("Failed to install log subscriber")?;

    tracing::info!(log_dir = %log_dir.display(), "logging initialized");
    Ok(())
}
