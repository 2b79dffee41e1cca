//! File-backed tracing setup.
//!
//! The terminal is owned by the UI, so log output goes to a file under the
//! data directory. `init` hands back a guard that syncs the file on drop.

use crate::config::AppConfig;
use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_NAME: &str = "jira-branch.log";

/// Keeps the log file alive for the lifetime of the process
pub struct LogGuard {
    file: File,
    path: PathBuf,
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        tracing::info!(log_file = %self.path.display(), "shutting down");
        let _ = self.file.sync_all();
    }
}

fn open_log_file(dir: &Path) -> Result<(File, PathBuf)> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    let path = dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    Ok((file, path))
}

/// Install the global subscriber. `RUST_LOG` wins over the configured filter.
pub fn init(config: &AppConfig) -> Result<LogGuard> {
    let (file, path) = open_log_file(&AppConfig::data_dir())
        .or_else(|_| open_log_file(&std::env::temp_dir()))?;
    let writer = file.try_clone().context("failed to clone log file handle")?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(writer)),
        )
        .try_init()
        .context("failed to install tracing subscriber")?;

    tracing::info!(log_file = %path.display(), "logging initialized");
    Ok(LogGuard { file, path })
}
