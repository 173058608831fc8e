//! Error types for the tr-session crate.
//!
//! [`RegenerateError`] never leaves the regenerator: it is logged and
//! reported through [`RegenerationOutcome`](crate::RegenerationOutcome).
//! [`SessionError`] is the only error a caller ever sees, and only when a
//! session starts.

use camino::Utf8PathBuf;
use tr_scanner::ScanError;
use tr_typegen::GenerateError;

/// Errors raised while regenerating the declaration file.
#[derive(Debug, thiserror::Error)]
pub enum RegenerateError {
    /// The generator rejected the current route tree.
    #[error("failed to generate declarations: {0}")]
    Generate(#[from] GenerateError),

    /// The generated text could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Path of the declaration file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl RegenerateError {
    /// Creates a new [`RegenerateError::Write`] error.
    #[inline]
    pub fn write(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if the error comes from the route tree itself.
    ///
    /// Such errors clear up on their own once the tree is consistent again,
    /// e.g. when the second half of a folder rename arrives.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Generate(_))
    }
}

/// Errors raised when starting a watch session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The initial scan of the project root failed.
    #[error("initial scan failed: {0}")]
    Scan(#[from] ScanError),
}
