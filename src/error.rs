//! Error types for mirrorctl
//!
//! Uses `thiserror` for library errors. Per-target failures are logged and
//! aggregated by the coordinator; only whole-run failures (unreadable config,
//! wrong user, lock contention) propagate out of `run_all`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mirrorctl operations
pub type MirrorResult<T> = Result<T, MirrorError>;

/// Main error type for mirrorctl operations
#[derive(Error, Debug)]
pub enum MirrorError {
    /// Missing required field in a mirror section
    #[error("Missing {field} in {section}")]
    MissingField { field: &'static str, section: String },

    /// Section declares a sync type the coordinator does not know
    #[error("Unknown sync type {sync_type} in {section}")]
    UnknownSyncType { sync_type: String, section: String },

    /// Destination path exists but cannot be mirrored into
    #[error("destination '{path}' invalid: {message}")]
    InvalidDestination { path: PathBuf, message: String },

    /// Configuration file could not be read
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration file could not be parsed
    #[error("failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Run started as the wrong effective user
    #[error("expected to run as user {expected} but running as {actual}")]
    WrongUser { expected: String, actual: String },

    /// Another orchestrator instance holds the run lock
    #[error("another instance is already running (lock file {path})")]
    LockHeld { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
