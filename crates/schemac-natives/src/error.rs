//! Error types for platform detection and resource staging.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while locating or staging native toolchain resources.
#[derive(Debug, Error)]
pub enum NativesError {
    /// The host OS/architecture has no native resource mapping.
    #[error("unsupported platform: {os}/{arch} (supported: {supported})")]
    UnsupportedPlatform {
        /// Host operating system name.
        os: String,
        /// Host CPU architecture name.
        arch: String,
        /// Comma-separated list of supported platform names.
        supported: String,
    },

    /// A resource expected to exist was not found.
    #[error("native resource not found: {}", path.display())]
    MissingResource {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Copying or finalizing a resource failed.
    #[error("staging {} failed: {detail}", path.display())]
    Staging {
        /// Destination (or source) path involved in the failure.
        path: PathBuf,
        /// Description of the underlying I/O failure.
        detail: String,
    },
}

/// Result type for natives operations.
pub type Result<T> = std::result::Result<T, NativesError>;
