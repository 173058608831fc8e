//! Filesystem events consumed by a watch session.
//!
//! # Event Flow
//!
//! ```text
//! OS notification (notify)
//!        │
//!        ▼
//!   FsEvent created (tr-watcher)
//!        │
//!        ▼
//!   WatchSession::handle_event (tr-session)
//! ```

use std::fmt;
use std::time::Instant;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// What happened to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FsEventKind {
    /// The file appeared, either created or moved into place.
    Added,
    /// The file disappeared, either removed or moved away.
    Deleted,
    /// The contents of an existing file changed.
    Modified,
}

impl FsEventKind {
    /// Returns a short lowercase label for logging.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Deleted => "deleted",
            Self::Modified => "modified",
        }
    }
}

impl fmt::Display for FsEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single filesystem event with a UTF-8 path guarantee.
///
/// # Examples
///
/// ```
/// use tr_core::{FsEvent, FsEventKind};
/// use camino::Utf8PathBuf;
///
/// let event = FsEvent::added(Utf8PathBuf::from("/project/app/index.tsx"));
/// assert_eq!(event.kind, FsEventKind::Added);
/// assert_eq!(event.file_name(), Some("index.tsx"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEvent {
    /// Absolute path of the affected file.
    pub path: Utf8PathBuf,

    /// What happened to the file.
    pub kind: FsEventKind,

    /// When the event was received.
    ///
    /// Uses [`Instant`] for monotonic timing; not suitable for display.
    pub timestamp: Instant,
}

impl FsEvent {
    /// Creates a new event; the timestamp is set to the current instant.
    #[inline]
    #[must_use]
    pub fn new(path: Utf8PathBuf, kind: FsEventKind) -> Self {
        Self {
            path,
            kind,
            timestamp: Instant::now(),
        }
    }

    /// Creates an [`FsEventKind::Added`] event.
    #[inline]
    #[must_use]
    pub fn added(path: impl Into<Utf8PathBuf>) -> Self {
        Self::new(path.into(), FsEventKind::Added)
    }

    /// Creates an [`FsEventKind::Deleted`] event.
    #[inline]
    #[must_use]
    pub fn deleted(path: impl Into<Utf8PathBuf>) -> Self {
        Self::new(path.into(), FsEventKind::Deleted)
    }

    /// Creates an [`FsEventKind::Modified`] event.
    #[inline]
    #[must_use]
    pub fn modified(path: impl Into<Utf8PathBuf>) -> Self {
        Self::new(path.into(), FsEventKind::Modified)
    }

    /// Returns the file name without the directory path.
    #[inline]
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_kind() {
        assert_eq!(FsEvent::added("/a.tsx").kind, FsEventKind::Added);
        assert_eq!(FsEvent::deleted("/a.tsx").kind, FsEventKind::Deleted);
        assert_eq!(FsEvent::modified("/a.tsx").kind, FsEventKind::Modified);
    }

    #[test]
    fn test_file_name() {
        let event = FsEvent::modified("/project/app/(tabs)/route.tsx");
        assert_eq!(event.file_name(), Some("route.tsx"));
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(FsEventKind::Added.to_string(), "added");
        assert_eq!(FsEventKind::Deleted.label(), "deleted");
        assert_eq!(FsEventKind::Modified.label(), "modified");
    }

    #[test]
    fn test_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&FsEventKind::Added).unwrap(),
            r#""added""#
        );
    }
}
