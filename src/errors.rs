// src/errors.rs

//! Crate-wide error types and aliases.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Lifecycle failures of a [`crate::session::WatchSession`].
///
/// Every variant leaves the session state as it was before the call, with
/// the exception of `ShutdownTimeout`, where the stuck observation thread is
/// detached and the session falls back to idle.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid directory: {}", .0.display())]
    InvalidDirectory(PathBuf),

    #[error("No directory set. Use setdir to set the directory to monitor.")]
    NoTargetConfigured,

    #[error("Observer is already running.")]
    AlreadyRunning,

    #[error("Observer is not running.")]
    NotRunning,

    #[error("Observer did not stop within {0:?}")]
    ShutdownTimeout(Duration),

    #[error("Observer thread panicked")]
    ObserverPanicked,

    #[error("File watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Failed to spawn observer thread: {0}")]
    Spawn(#[source] std::io::Error),
}

#[derive(Error, Debug)]
pub enum CncwatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, CncwatchError>;
