//! Error types for the tr-scanner crate.
//!
//! This module provides the [`ScanError`] type for errors that can occur
//! while seeding a file context from disk.

/// Errors that can occur during scanning operations.
///
/// # Error Recovery Strategy
///
/// None of these are recoverable mid-scan: a context built from a partial
/// walk would silently drop routes. Callers abort session start instead.
///
/// # Examples
///
/// ```
/// use tr_scanner::ScanError;
///
/// fn describe(err: &ScanError) -> String {
///     match err {
///         ScanError::Walk(e) => format!("walk error: {e}"),
///         ScanError::Pattern { pattern, .. } => format!("bad pattern: {pattern}"),
///         ScanError::Config(msg) => format!("config error: {msg}"),
///         ScanError::NonUtf8Path(p) => format!("invalid path: {}", p.display()),
///     }
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Failed to walk a directory.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// An ignore pattern could not be compiled.
    #[error("invalid ignore pattern '{pattern}': {source}")]
    Pattern {
        /// The pattern as configured.
        pattern: String,
        /// The underlying glob error.
        #[source]
        source: ignore::Error,
    },

    /// Invalid scanner configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A path is not valid UTF-8.
    ///
    /// Context keys are UTF-8 strings, so such files cannot be tracked.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),
}

impl ScanError {
    /// Creates a new [`ScanError::Pattern`] error.
    #[inline]
    pub fn pattern(pattern: impl Into<String>, source: ignore::Error) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Creates a new [`ScanError::Config`] error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
