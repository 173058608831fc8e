//! The file context: every known file under the project root.
//!
//! A [`FileContext`] maps each [`RelativePath`] to a [`ModuleLoader`] that can
//! read the file on demand. It holds route files and everything else
//! (layouts, components, assets) alike; the route index is derived from it.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};

use super::path::RelativePath;
use crate::error::ContextError;

/// Lazy handle to the contents of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLoader {
    path: Utf8PathBuf,
}

impl ModuleLoader {
    /// Returns the absolute path this loader reads from.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Reads the file contents.
    pub fn load(&self) -> Result<String, ContextError> {
        std::fs::read_to_string(&self.path).map_err(|source| ContextError::Load {
            path: self.path.clone(),
            source,
        })
    }
}

/// Ordered mapping from root-relative path to module loader.
///
/// Keys iterate in lexical order, which keeps anything derived from the
/// context deterministic.
///
/// # Examples
///
/// ```
/// use tr_core::{FileContext, RelativePath};
/// use camino::Utf8PathBuf;
///
/// let mut ctx = FileContext::new(Utf8PathBuf::from("/project/app"));
/// assert!(ctx.add(RelativePath::new("index.tsx")));
/// assert!(ctx.add(RelativePath::new("about.tsx")));
///
/// let keys: Vec<_> = ctx.keys().map(|k| k.as_str()).collect();
/// assert_eq!(keys, vec!["./about.tsx", "./index.tsx"]);
///
/// assert!(ctx.delete("./about.tsx"));
/// assert_eq!(ctx.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileContext {
    root: Utf8PathBuf,
    modules: BTreeMap<RelativePath, ModuleLoader>,
}

impl FileContext {
    /// Creates an empty context rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            modules: BTreeMap::new(),
        }
    }

    /// Creates a context holding the given keys.
    #[must_use]
    pub fn from_keys(
        root: impl Into<Utf8PathBuf>,
        keys: impl IntoIterator<Item = RelativePath>,
    ) -> Self {
        let mut context = Self::new(root);
        for key in keys {
            context.add(key);
        }
        context
    }

    /// Returns the directory all keys are relative to.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Tracks `path`, returning `true` if it was not tracked before.
    ///
    /// Adding a tracked path replaces its loader with an equivalent one.
    pub fn add(&mut self, path: RelativePath) -> bool {
        let loader = ModuleLoader {
            path: self.root.join(path.without_marker()),
        };
        self.modules.insert(path, loader).is_none()
    }

    /// Stops tracking `path`, returning `true` if it was tracked.
    pub fn delete(&mut self, path: &str) -> bool {
        self.modules.remove(path).is_some()
    }

    /// Stops tracking every path below the directory `dir`, returning them.
    ///
    /// `dir` itself is not a key: directories are never tracked.
    pub fn delete_dir(&mut self, dir: &str) -> Vec<RelativePath> {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        let removed: Vec<RelativePath> = self
            .modules
            .keys()
            .filter(|key| key.as_str().starts_with(&prefix))
            .cloned()
            .collect();
        for key in &removed {
            self.modules.remove(key);
        }
        removed
    }

    /// Returns `true` if `path` is tracked.
    #[inline]
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.modules.contains_key(path)
    }

    /// Iterates over the tracked paths in lexical order.
    pub fn keys(&self) -> impl Iterator<Item = &RelativePath> + '_ {
        self.modules.keys()
    }

    /// Returns the loader for `path`, if tracked.
    #[inline]
    #[must_use]
    pub fn loader(&self, path: &str) -> Option<&ModuleLoader> {
        self.modules.get(path)
    }

    /// Reads the contents of a tracked module.
    pub fn load(&self, path: &str) -> Result<String, ContextError> {
        self.loader(path)
            .ok_or_else(|| ContextError::UnknownModule(path.to_owned()))?
            .load()
    }

    /// Returns the number of tracked paths.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns `true` if nothing is tracked.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> FileContext {
        FileContext::from_keys(
            "/project/app",
            ["index.tsx", "(tabs)/route.tsx", "_layout.tsx"]
                .into_iter()
                .map(RelativePath::new),
        )
    }

    #[test]
    fn test_add_reports_new_paths() {
        let mut ctx = FileContext::new("/project/app");
        assert!(ctx.add(RelativePath::new("index.tsx")));
        assert!(!ctx.add(RelativePath::new("./index.tsx")));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_delete_reports_tracked_paths() {
        let mut ctx = context();
        assert!(ctx.delete("./index.tsx"));
        assert!(!ctx.delete("./index.tsx"));
        assert!(!ctx.contains("./index.tsx"));
    }

    #[test]
    fn test_delete_dir_removes_descendants() {
        let mut ctx = context();
        ctx.add(RelativePath::new("(tabs,test)/route.tsx"));

        let removed = ctx.delete_dir("./(tabs)");
        assert_eq!(removed, vec![RelativePath::new("(tabs)/route.tsx")]);
        assert!(ctx.contains("./(tabs,test)/route.tsx"));
        assert!(ctx.delete_dir("./(tabs)").is_empty());
    }

    #[test]
    fn test_keys_are_ordered() {
        let ctx = context();
        let keys: Vec<_> = ctx.keys().map(RelativePath::as_str).collect();
        assert_eq!(keys, vec!["./(tabs)/route.tsx", "./_layout.tsx", "./index.tsx"]);
    }

    #[test]
    fn test_loader_path_is_absolute() {
        let ctx = context();
        let loader = ctx.loader("./(tabs)/route.tsx").unwrap();
        assert_eq!(loader.path(), Utf8Path::new("/project/app/(tabs)/route.tsx"));
    }

    #[test]
    fn test_load_reads_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        std::fs::write(root.join("index.tsx"), "export default function Home() {}").unwrap();

        let mut ctx = FileContext::new(root);
        ctx.add(RelativePath::new("index.tsx"));

        let source = ctx.load("./index.tsx").unwrap();
        assert!(source.contains("Home"));
    }

    #[test]
    fn test_load_unknown_module() {
        let ctx = context();
        assert!(matches!(
            ctx.load("./missing.tsx"),
            Err(ContextError::UnknownModule(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let ctx = context();
        assert!(matches!(
            ctx.load("./index.tsx"),
            Err(ContextError::Load { .. })
        ));
    }

    #[test]
    fn test_default_is_empty() {
        let ctx = FileContext::default();
        assert!(ctx.is_empty());
        assert_eq!(ctx.root(), Utf8Path::new(""));
    }
}
