//! Path filtering for watch events.
//!
//! Filters run on the watcher thread, before an event reaches the channel.
//! A session needs to see every file below the app root (layouts and assets
//! included), so the useful filters here drop whole directories rather than
//! file types.
//!
//! [`FileWatcher`](crate::FileWatcher) hands filters paths relative to the
//! watch root, so directories above the root never match.
//!
//! # Examples
//!
//! ```
//! use tr_watcher::{FileFilter, SkipDirsFilter};
//! use camino::Utf8Path;
//!
//! let filter = SkipDirsFilter::new(&["node_modules", ".git"]);
//!
//! assert!(filter.should_process(Utf8Path::new("(tabs)/index.tsx")));
//! assert!(!filter.should_process(Utf8Path::new("node_modules/pkg/index.js")));
//! ```

use camino::Utf8Path;
use smallvec::SmallVec;

/// Decides which event paths are forwarded to the session.
///
/// Filters must be [`Send`], [`Sync`] and `'static`: they are moved into the
/// notify callback, which runs on its own thread.
pub trait FileFilter: Send + Sync + 'static {
    /// Returns `true` if events for `path` should be forwarded.
    ///
    /// `path` is relative to the watch root.
    fn should_process(&self, path: &Utf8Path) -> bool;
}

/// Forwards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllFilter;

impl FileFilter for AcceptAllFilter {
    #[inline]
    fn should_process(&self, _path: &Utf8Path) -> bool {
        true
    }
}

/// Drops events for paths inside any of the named directories.
///
/// A path is dropped if any of its components equals one of the names.
#[derive(Debug, Clone)]
pub struct SkipDirsFilter {
    dirs: SmallVec<[String; 8]>,
}

impl SkipDirsFilter {
    /// Creates a filter skipping the given directory names.
    #[must_use]
    pub fn new(dirs: &[&str]) -> Self {
        Self {
            dirs: dirs.iter().map(|dir| (*dir).to_owned()).collect(),
        }
    }
}

impl FileFilter for SkipDirsFilter {
    fn should_process(&self, path: &Utf8Path) -> bool {
        !path
            .components()
            .any(|component| self.dirs.iter().any(|dir| dir == component.as_str()))
    }
}

/// Combines filters with AND logic; an empty composite accepts everything.
///
/// # Examples
///
/// ```
/// use tr_watcher::{CompositeFilter, FileFilter, SkipDirsFilter};
/// use camino::Utf8Path;
///
/// struct NoSnapshots;
/// impl FileFilter for NoSnapshots {
///     fn should_process(&self, path: &Utf8Path) -> bool {
///         path.extension() != Some("snap")
///     }
/// }
///
/// let filter = CompositeFilter::new()
///     .and(SkipDirsFilter::new(&["node_modules"]))
///     .and(NoSnapshots);
///
/// assert!(filter.should_process(Utf8Path::new("/app/index.tsx")));
/// assert!(!filter.should_process(Utf8Path::new("/app/index.tsx.snap")));
/// ```
pub struct CompositeFilter {
    filters: Vec<Box<dyn FileFilter>>,
}

impl CompositeFilter {
    /// Creates an empty composite filter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Adds a filter to the composite.
    #[must_use]
    pub fn and<F: FileFilter>(mut self, filter: F) -> Self {
        self.filters.push(Box::new(filter));
        self
    }
}

impl Default for CompositeFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl FileFilter for CompositeFilter {
    fn should_process(&self, path: &Utf8Path) -> bool {
        self.filters.iter().all(|f| f.should_process(path))
    }
}

impl<F: FileFilter + ?Sized> FileFilter for Box<F> {
    fn should_process(&self, path: &Utf8Path) -> bool {
        (**self).should_process(path)
    }
}

impl<F: FileFilter + ?Sized> FileFilter for std::sync::Arc<F> {
    fn should_process(&self, path: &Utf8Path) -> bool {
        (**self).should_process(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_all_filter() {
        let filter = AcceptAllFilter;
        assert!(filter.should_process(Utf8Path::new("/app/logo.png")));
        assert!(filter.should_process(Utf8Path::new("")));
    }

    #[test]
    fn test_skip_dirs_matches_whole_components() {
        let filter = SkipDirsFilter::new(&["node_modules", ".expo"]);

        assert!(!filter.should_process(Utf8Path::new("/app/node_modules/a.js")));
        assert!(!filter.should_process(Utf8Path::new("/app/.expo/types/router.d.ts")));
        assert!(filter.should_process(Utf8Path::new("/app/node_modules_backup/a.js")));
        assert!(filter.should_process(Utf8Path::new("/app/(tabs)/index.tsx")));
    }

    #[test]
    fn test_composite_filter_empty() {
        assert!(CompositeFilter::new().should_process(Utf8Path::new("anything")));
    }

    #[test]
    fn test_composite_filter_and() {
        let filter = CompositeFilter::new()
            .and(SkipDirsFilter::new(&["node_modules"]))
            .and(SkipDirsFilter::new(&[".git"]));

        assert!(filter.should_process(Utf8Path::new("/app/index.tsx")));
        assert!(!filter.should_process(Utf8Path::new("/app/node_modules/a.js")));
        assert!(!filter.should_process(Utf8Path::new("/app/.git/HEAD")));
    }

    #[test]
    fn test_boxed_and_shared_filters() {
        let boxed: Box<dyn FileFilter> = Box::new(SkipDirsFilter::new(&["build"]));
        assert!(!boxed.should_process(Utf8Path::new("/app/build/a.js")));

        let shared = std::sync::Arc::new(AcceptAllFilter);
        assert!(shared.should_process(Utf8Path::new("/app/build/a.js")));
    }
}
