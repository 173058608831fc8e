//! Error types for the tr-watcher crate.

use camino::Utf8PathBuf;

/// Errors that can occur while watching the app root.
///
/// # Error Recovery Strategy
///
/// - **Notify errors** ([`WatchError::Notify`]): Fatal, the watcher is gone
/// - **Path not found** ([`WatchError::PathNotFound`]): Fatal, nothing to watch
/// - **Channel closed** ([`WatchError::ChannelClosed`]): Fatal, no consumer left
/// - **Non-UTF-8 path** ([`WatchError::NonUtf8Path`]): Recoverable, the event is skipped
/// - **I/O errors** ([`WatchError::Io`]): Fatal
///
/// # Examples
///
/// ```
/// use tr_watcher::WatchError;
///
/// let err = WatchError::path_not_found("/project/app");
/// assert!(err.is_fatal());
/// assert_eq!(err.path().map(|p| p.as_str()), Some("/project/app"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// The notify watcher failed to start or to watch the root.
    #[error("notify watcher error: {0}")]
    Notify(#[from] notify::Error),

    /// The path to watch does not exist.
    #[error("path does not exist: {0}")]
    PathNotFound(Utf8PathBuf),

    /// The watcher task ended without reporting back.
    #[error("event channel closed unexpectedly")]
    ChannelClosed,

    /// A notified path is not valid UTF-8.
    ///
    /// Such events are logged and skipped rather than returned.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),

    /// An I/O error occurred while resolving the watch path.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WatchError {
    /// Creates a new [`WatchError::PathNotFound`] error.
    #[inline]
    pub fn path_not_found(path: impl Into<Utf8PathBuf>) -> Self {
        Self::PathNotFound(path.into())
    }

    /// Creates a new [`WatchError::NonUtf8Path`] error.
    #[inline]
    pub fn non_utf8_path(path: impl Into<std::path::PathBuf>) -> Self {
        Self::NonUtf8Path(path.into())
    }

    /// Returns `true` if watching can continue after this error.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NonUtf8Path(_))
    }

    /// Returns `true` if watching must stop.
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Returns the path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::PathNotFound(path) => Some(path),
            Self::Notify(_) | Self::ChannelClosed | Self::NonUtf8Path(_) | Self::Io(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_path_not_found_is_fatal() {
        let err = WatchError::path_not_found("/project/app");
        assert!(err.is_fatal());
        assert_eq!(err.to_string(), "path does not exist: /project/app");
    }

    #[test]
    fn test_non_utf8_is_recoverable() {
        let err = WatchError::non_utf8_path(PathBuf::from("app/index.tsx"));
        assert!(err.is_recoverable());
        assert!(err.path().is_none());
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    #[test]
    fn test_channel_closed() {
        let err = WatchError::ChannelClosed;
        assert!(err.is_fatal());
        assert!(err.path().is_none());
    }
}
