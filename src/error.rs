//! Common error types for TrackForge

use thiserror::Error;

/// Common result type for TrackForge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced before or outside per-file processing.
///
/// Per-file failures never use this type; they degrade to a recorded
/// outcome so the batch keeps running.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Fatal precondition failure (missing source directory, ffmpeg unavailable)
    #[error("Preflight check failed: {0}")]
    Preflight(String),
}
