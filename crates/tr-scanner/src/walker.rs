//! Directory traversal that seeds a [`FileContext`].
//!
//! This module provides [`FileWalker`], which uses the `ignore` crate to
//! walk the project root while respecting `.gitignore` files and the
//! configured ignore patterns.
//!
//! # Features
//!
//! - Respects `.gitignore` and `.ignore` patterns
//! - Applies glob ignore patterns through `ignore::overrides`
//! - Skips hidden entries and heavy directories (`node_modules`, ...)
//! - Produces `./`-prefixed keys with `/` separators
//!
//! Every file is kept regardless of extension: the context tracks layouts,
//! components and assets next to the route files.

use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;
use ignore::overrides::{Override, OverrideBuilder};
use tr_core::{FileContext, RelativePath};

use crate::error::ScanError;

/// Directories skipped during scanning.
///
/// They never contain routes, and they are where most of the filesystem
/// noise comes from.
pub const SKIP_DIRECTORIES: &[&str] = &["node_modules", ".git", ".expo", "dist", "build"];

/// A file walker that discovers every file below a project root.
///
/// # Examples
///
/// ```no_run
/// use tr_scanner::FileWalker;
/// use camino::Utf8Path;
///
/// # fn main() -> Result<(), tr_scanner::ScanError> {
/// let walker = FileWalker::new(Utf8Path::new("/project/app"))?
///     .with_ignore_patterns(&["**/*.test.tsx".to_owned()])?;
/// let context = walker.collect_context()?;
///
/// for key in context.keys() {
///     println!("Found: {key}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FileWalker {
    /// The root directory to walk.
    root: Utf8PathBuf,
    /// Additional directories to skip (beyond [`SKIP_DIRECTORIES`]).
    skip_dirs: Vec<String>,
    /// Compiled ignore patterns, if any were configured.
    overrides: Option<Override>,
    /// Whether to follow symbolic links.
    follow_links: bool,
}

impl FileWalker {
    /// Creates a new file walker for the given root directory.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Config`] if the root path doesn't exist or
    /// isn't a directory.
    pub fn new(root: &Utf8Path) -> Result<Self, ScanError> {
        if !root.exists() {
            return Err(ScanError::config(format!(
                "root path does not exist: {root}"
            )));
        }
        if !root.is_dir() {
            return Err(ScanError::config(format!(
                "root path is not a directory: {root}"
            )));
        }

        Ok(Self {
            root: root.to_owned(),
            skip_dirs: Vec::new(),
            overrides: None,
            follow_links: false,
        })
    }

    /// Adds directories to skip during traversal.
    ///
    /// These are in addition to [`SKIP_DIRECTORIES`].
    #[must_use]
    pub fn with_skip_dirs(mut self, dirs: &[&str]) -> Self {
        self.skip_dirs.extend(dirs.iter().map(ToString::to_string));
        self
    }

    /// Excludes files matching any of the given glob patterns.
    ///
    /// Patterns are matched against paths relative to the root, gitignore
    /// style (`**/node_modules/**`, `*.d.ts`).
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Pattern`] if a pattern is not a valid glob.
    pub fn with_ignore_patterns(mut self, patterns: &[String]) -> Result<Self, ScanError> {
        if patterns.is_empty() {
            self.overrides = None;
            return Ok(self);
        }

        let mut builder = OverrideBuilder::new(&self.root);
        for pattern in patterns {
            // Overrides whitelist by default; a leading `!` turns a glob into an ignore rule
            builder
                .add(&format!("!{pattern}"))
                .map_err(|source| ScanError::pattern(pattern, source))?;
        }
        let overrides = builder
            .build()
            .map_err(|source| ScanError::pattern(patterns.join(", "), source))?;

        self.overrides = Some(overrides);
        Ok(self)
    }

    /// Configures whether to follow symbolic links.
    ///
    /// By default, symbolic links are not followed.
    #[must_use]
    pub const fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Collects the absolute paths of all files in the directory tree.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Walk`] if directory traversal fails.
    /// Returns [`ScanError::NonUtf8Path`] if a non-UTF-8 path is encountered.
    pub fn collect_paths(&self) -> Result<Vec<Utf8PathBuf>, ScanError> {
        let mut paths = Vec::new();

        for result in self.build_walker() {
            let entry = result?;

            // Skip directories and non-files
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            let utf8_path =
                Utf8Path::from_path(path).ok_or_else(|| ScanError::NonUtf8Path(path.to_owned()))?;

            if self.should_skip_path(utf8_path) {
                continue;
            }

            paths.push(utf8_path.to_owned());
        }

        Ok(paths)
    }

    /// Builds a [`FileContext`] holding every file below the root.
    ///
    /// # Errors
    ///
    /// Same as [`collect_paths`](Self::collect_paths).
    pub fn collect_context(&self) -> Result<FileContext, ScanError> {
        let mut context = FileContext::new(self.root.clone());

        for path in self.collect_paths()? {
            let Ok(relative) = path.strip_prefix(&self.root) else {
                continue;
            };
            context.add(RelativePath::from_components(relative));
        }

        Ok(context)
    }

    /// Builds the ignore walker with configured settings.
    fn build_walker(&self) -> ignore::Walk {
        let mut builder = WalkBuilder::new(&self.root);
        builder
            // Enable standard filters (.gitignore, .ignore, hidden files)
            .standard_filters(true)
            .follow_links(self.follow_links)
            .threads(1)
            // Don't require the root to be a git repo
            .require_git(false);

        if let Some(overrides) = &self.overrides {
            builder.overrides(overrides.clone());
        }

        builder.build()
    }

    /// Checks if a path should be skipped based on directory name.
    fn should_skip_path(&self, path: &Utf8Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);

        relative.components().any(|component| {
            let name = component.as_str();
            SKIP_DIRECTORIES.contains(&name) || self.skip_dirs.iter().any(|d| d == name)
        })
    }

    /// Returns the root directory being walked.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}
