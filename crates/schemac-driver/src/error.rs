//! Driver errors.

use std::path::PathBuf;

use schemac_natives::NativesError;
use thiserror::Error;

/// Errors that can occur while preparing or running a compilation.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Invalid caller-supplied configuration, detected before any
    /// filesystem mutation or process spawn.
    #[error("configuration error: {detail}")]
    Config { detail: String },

    /// Platform detection or resource staging failure.
    #[error(transparent)]
    Natives(#[from] NativesError),

    /// Mirroring the schema tree into the working directory failed.
    #[error("mirroring schema tree failed at {}: {detail}", dir.display())]
    Mirror {
        /// Directory that failed to copy.
        dir: PathBuf,
        /// Underlying I/O failure.
        detail: String,
    },

    /// The compiler process could not be spawned or waited on.
    #[error("cannot run compiler for schema {schema}: {source}")]
    Spawn {
        /// Schema being compiled when the failure occurred.
        schema: String,
        /// Underlying I/O cause.
        source: std::io::Error,
    },

    /// The compiler exited non-zero (or was killed by a signal).
    #[error("compiling {schema} failed with exit code {}", code.map(|c| c.to_string()).unwrap_or_else(|| "<signal>".into()))]
    ExitStatus {
        /// Schema whose compilation failed.
        schema: String,
        /// Exit code, or `None` when terminated by a signal.
        code: Option<i32>,
    },
}

/// Result type for driver operations.
pub type Result<T> = std::result::Result<T, DriverError>;
