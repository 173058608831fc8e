//! Mapping absolute event paths onto the project root.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use tr_core::{RelativePath, is_typed_route};

/// A path that lies below the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedPath {
    /// The path relative to the root, with the `./` marker.
    pub relative: RelativePath,
    /// Whether the basename names a typed route file.
    pub is_route_candidate: bool,
}

/// Where an event path lies relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Not below the root, or no root is configured.
    Outside,
    /// Below the root.
    Inside(ClassifiedPath),
}

/// Classifies absolute paths against an optional project root.
///
/// Paths are normalized lexically (`.` and `..` components) before they are
/// compared with the root, so `/app/../other/x.tsx` is outside `/app`. The
/// root itself is outside: only paths strictly below it are tracked.
///
/// # Examples
///
/// ```
/// use camino::{Utf8Path, Utf8PathBuf};
/// use tr_session::{Classification, PathClassifier};
///
/// let classifier = PathClassifier::new(Some(Utf8PathBuf::from("/project/app")));
///
/// let Classification::Inside(path) = classifier.classify(Utf8Path::new("/project/app/about.tsx")) else {
///     panic!("expected inside");
/// };
/// assert_eq!(path.relative.as_str(), "./about.tsx");
/// assert!(path.is_route_candidate);
///
/// assert_eq!(
///     classifier.classify(Utf8Path::new("/project/app/../lib/util.ts")),
///     Classification::Outside
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathClassifier {
    root: Option<Utf8PathBuf>,
}

impl PathClassifier {
    /// Creates a classifier for `root`; `None` classifies everything as
    /// [`Classification::Outside`].
    #[must_use]
    pub fn new(root: Option<Utf8PathBuf>) -> Self {
        Self {
            root: root.as_deref().map(normalize),
        }
    }

    /// Returns the normalized root, if any.
    #[inline]
    #[must_use]
    pub fn root(&self) -> Option<&Utf8Path> {
        self.root.as_deref()
    }

    /// Classifies an event path.
    #[must_use]
    pub fn classify(&self, path: &Utf8Path) -> Classification {
        let Some(root) = &self.root else {
            return Classification::Outside;
        };

        let normalized = normalize(path);
        let Ok(relative) = normalized.strip_prefix(root) else {
            return Classification::Outside;
        };
        if relative.as_str().is_empty() {
            return Classification::Outside;
        }

        let relative = RelativePath::from_components(relative);
        let is_route_candidate = is_typed_route(relative.basename());
        Classification::Inside(ClassifiedPath {
            relative,
            is_route_candidate,
        })
    }
}

/// Resolves `.` and `..` components without touching the filesystem.
fn normalize(path: &Utf8Path) -> Utf8PathBuf {
    let mut normalized = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                if matches!(
                    normalized.components().next_back(),
                    Some(Utf8Component::Normal(_))
                ) {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_str()),
        }
    }
    normalized
}
