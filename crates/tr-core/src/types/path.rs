//! Root-relative path type.

use std::borrow::Borrow;
use std::fmt;

use camino::{Utf8Component, Utf8Path};
use serde::Serialize;

/// Prefix marking a path as relative to the project root.
pub const ROOT_MARKER: &str = "./";

/// A path relative to the project root, always starting with `./`.
///
/// Separators are normalized to `/` so that keys compare equal no matter
/// which platform produced them.
///
/// # Examples
///
/// ```
/// use tr_core::RelativePath;
///
/// let path = RelativePath::new("(tabs)/index.tsx");
/// assert_eq!(path.as_str(), "./(tabs)/index.tsx");
/// assert_eq!(path.basename(), "index.tsx");
///
/// // Already marked paths are left alone
/// assert_eq!(RelativePath::new("./about.tsx").as_str(), "./about.tsx");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RelativePath(String);

impl RelativePath {
    /// Creates a relative path, adding the `./` marker if it is missing.
    #[must_use]
    pub fn new(path: impl AsRef<str>) -> Self {
        let normalized = path.as_ref().replace('\\', "/");
        if normalized.starts_with(ROOT_MARKER) {
            Self(normalized)
        } else {
            Self(format!("{ROOT_MARKER}{normalized}"))
        }
    }

    /// Creates a relative path from a path already stripped of the root.
    ///
    /// Only normal components are kept, joined with `/`.
    #[must_use]
    pub fn from_components(path: &Utf8Path) -> Self {
        let joined = path
            .components()
            .filter_map(|component| match component {
                Utf8Component::Normal(part) => Some(part),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        Self::new(joined)
    }

    /// Returns the path as a string slice, including the `./` marker.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the path without the leading `./`.
    #[inline]
    #[must_use]
    pub fn without_marker(&self) -> &str {
        self.0.strip_prefix(ROOT_MARKER).unwrap_or(&self.0)
    }

    /// Returns the final component of the path.
    #[must_use]
    pub fn basename(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RelativePath {
    fn borrow(&self) -> &str {
        &self.0
    }
}
