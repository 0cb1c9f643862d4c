//! Unified error type for the burrow workspace.
//!
//! Variants follow the launch taxonomy: setup failures happen before the
//! isolated child exists, isolation failures before the target command runs,
//! and cleanup failures after it has finished.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum BurrowError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value or launch request is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// Creating the isolated child failed (namespaces, id maps, re-exec).
    #[error("setup failed: {message}")]
    Setup {
        /// Description of the failed setup step.
        message: String,
    },

    /// Isolating the filesystem view failed before the target command ran.
    #[error("isolation failed: {message}")]
    Isolation {
        /// Description of the failed isolation step.
        message: String,
    },

    /// Releasing a resource after the target command completed failed.
    #[error("cleanup failed: {message}")]
    Cleanup {
        /// Description of the failed cleanup step.
        message: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

impl BurrowError {
    /// Returns `true` if the error happened after the useful work was done.
    ///
    /// Such errors are reported but never change the propagated exit status.
    #[must_use]
    pub const fn is_cleanup(&self) -> bool {
        matches!(self, Self::Cleanup { .. })
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, BurrowError>;
