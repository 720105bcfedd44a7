use crate::config::LogConfig;
use std::sync::Mutex;
use thiserror::Error;

/// Install a global `tracing` subscriber that appends log messages to the
/// configured log file.  If no log file is configured, nothing is installed
/// and all log messages are discarded, as the terminal belongs to the game.
pub(crate) fn init(config: &LogConfig) -> Result<(), LogError> {
    let Some(path) = config.file.as_deref() else {
        return Ok(());
    };
    let file = fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(LogError::Open)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(config.level)
        .try_init()
        .map_err(LogError::Install)
}

#[derive(Debug, Error)]
pub(crate) enum LogError {
    #[error("failed to open log file")]
    Open(#[source] std::io::Error),
    #[error("failed to install logger")]
    Install(#[source] Box<dyn std::error::Error + Send + Sync>),
}
