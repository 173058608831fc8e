//! Error types for the tr-typegen crate.

/// Errors that can occur while generating a declaration file.
///
/// Both variants describe a route tree that cannot be typed as it stands.
/// They are expected while a rename is half-applied and go away once the
/// tree is consistent again.
///
/// # Examples
///
/// ```
/// use tr_typegen::GenerateError;
///
/// let err = GenerateError::ConflictingRoutes {
///     href: "/(tabs)/route".to_owned(),
///     first: "./(tabs)/route.tsx".to_owned(),
///     second: "./(tabs,test)/route.tsx".to_owned(),
/// };
/// assert!(err.to_string().contains("/(tabs)/route"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    /// Two route files resolve to the same href.
    #[error("conflicting routes: {first} and {second} both resolve to {href}")]
    ConflictingRoutes {
        /// The shared href, in bracket form.
        href: String,
        /// The file seen first (in key order).
        first: String,
        /// The file that collided with it.
        second: String,
    },

    /// A path segment is malformed (`()`, `[]`, `[...]`, or empty).
    #[error("invalid route segment '{segment}' in {path}")]
    InvalidSegment {
        /// The route file containing the segment.
        path: String,
        /// The offending segment.
        segment: String,
    },

    /// The path handed to the route parser is not a route file.
    #[error("not a route file: {0}")]
    NotARoute(String),
}

impl GenerateError {
    /// Creates a new [`GenerateError::InvalidSegment`] error.
    #[inline]
    pub fn invalid_segment(path: impl Into<String>, segment: impl Into<String>) -> Self {
        Self::InvalidSegment {
            path: path.into(),
            segment: segment.into(),
        }
    }
}
