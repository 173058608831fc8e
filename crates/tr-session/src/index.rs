//! The set of tracked route files.

use tr_core::{FileContext, FxHashSet, RelativePath, is_typed_route};

/// The route files of a [`FileContext`].
///
/// Always a subset of the context's keys once an event has been fully
/// processed. Membership, not the naming predicate, decides whether a
/// deletion or modification touches a route.
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
/// use tr_core::{FileContext, RelativePath};
/// use tr_session::RouteIndex;
///
/// let context = FileContext::from_keys(
///     Utf8PathBuf::from("/project/app"),
///     [RelativePath::new("index.tsx"), RelativePath::new("_layout.tsx")],
/// );
/// let routes = RouteIndex::from_context(&context);
///
/// assert!(routes.contains("./index.tsx"));
/// assert!(!routes.contains("./_layout.tsx"));
/// assert!(routes.is_subset_of(&context));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteIndex {
    routes: FxHashSet<RelativePath>,
}

impl RouteIndex {
    /// Seeds an index with every route file in `context`.
    #[must_use]
    pub fn from_context(context: &FileContext) -> Self {
        let routes = context
            .keys()
            .filter(|key| is_typed_route(key.basename()))
            .cloned()
            .collect();
        Self { routes }
    }

    /// Returns `true` if `path` is a tracked route file.
    #[inline]
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.routes.contains(path)
    }

    /// Tracks `path`, returning `true` if it was not tracked before.
    pub fn insert(&mut self, path: RelativePath) -> bool {
        self.routes.insert(path)
    }

    /// Stops tracking `path`, returning `true` if it was tracked.
    pub fn remove(&mut self, path: &str) -> bool {
        self.routes.remove(path)
    }

    /// Returns the number of tracked route files.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no route file is tracked.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterates over the tracked route files in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = &RelativePath> + '_ {
        let mut routes: Vec<&RelativePath> = self.routes.iter().collect();
        routes.sort_unstable();
        routes.into_iter()
    }

    /// Returns `true` if every tracked route is a key of `context`.
    #[must_use]
    pub fn is_subset_of(&self, context: &FileContext) -> bool {
        self.routes.iter().all(|route| context.contains(route.as_str()))
    }
}
