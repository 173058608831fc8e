//! Error types for the tr-core crate.
//!
//! This module provides [`ConfigError`] for configuration loading and
//! validation, and [`ContextError`] for failures reading a module through a
//! [`FileContext`](crate::FileContext).

use camino::Utf8PathBuf;

/// Errors that can occur during configuration loading and validation.
///
/// # Examples
///
/// ```
/// use tr_core::ConfigError;
/// use camino::Utf8PathBuf;
///
/// let error = ConfigError::MissingDirectory(Utf8PathBuf::from("/some/app"));
/// assert!(error.to_string().contains("/some/app"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The provided path is invalid or malformed.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The invalid path.
        path: Utf8PathBuf,
        /// Explanation of why the path is invalid.
        reason: String,
    },

    /// A required directory does not exist.
    #[error("missing required directory: {0}")]
    MissingDirectory(Utf8PathBuf),

    /// A configuration option has an invalid value.
    #[error("invalid configuration option '{option}': {reason}")]
    InvalidOption {
        /// The name of the invalid option.
        option: String,
        /// Explanation of why the option is invalid.
        reason: String,
    },

    /// An I/O error occurred while reading configuration.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates a new [`ConfigError::InvalidOption`] error.
    #[inline]
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised when loading a module through a file context.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    /// The requested path is not part of the context.
    #[error("module not found in context: {0}")]
    UnknownModule(String),

    /// The module is tracked but its contents could not be read.
    #[error("failed to load module {path}: {source}")]
    Load {
        /// Absolute path of the module on disk.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ContextError {
    /// Returns the absolute path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::Load { path, .. } => Some(path),
            Self::UnknownModule(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_invalid_path_display() {
        let error = ConfigError::InvalidPath {
            path: Utf8PathBuf::from("relative/app"),
            reason: "app root must be absolute".to_owned(),
        };
        let msg = error.to_string();
        assert!(msg.contains("relative/app"));
        assert!(msg.contains("must be absolute"));
    }

    #[test]
    fn test_invalid_option_display() {
        let error = ConfigError::invalid_option("debounce_ms", "must be greater than zero");
        let msg = error.to_string();
        assert!(msg.contains("debounce_ms"));
        assert!(msg.contains("greater than zero"));
    }

    #[test]
    fn test_context_error_unknown_module() {
        let error = ContextError::UnknownModule("./missing.tsx".to_owned());
        assert!(error.path().is_none());
        assert!(error.to_string().contains("./missing.tsx"));
    }

    #[test]
    fn test_context_error_load() {
        let error = ContextError::Load {
            path: Utf8PathBuf::from("/app/index.tsx"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(error.path().map(|p| p.as_str()), Some("/app/index.tsx"));
        assert!(error.to_string().contains("/app/index.tsx"));
    }
}
