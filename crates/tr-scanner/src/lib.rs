//! Filesystem scan that seeds the typed-routes file context.
//!
//! A watch session starts from one full, synchronous scan of the project
//! root. This crate performs that scan and hands back a
//! [`FileContext`](tr_core::FileContext) holding every file found.
//!
//! # Overview
//!
//! - [`FileWalker`]: Directory traversal respecting `.gitignore` and glob
//!   ignore patterns
//! - [`Scanner`]: Configured entry point returning a [`ScanResult`]
//!
//! # Example
//!
//! ```no_run
//! use tr_scanner::{ScanConfig, Scanner};
//! use camino::Utf8Path;
//!
//! # fn main() -> Result<(), tr_scanner::ScanError> {
//! let config = ScanConfig::new(Utf8Path::new("/project/app"))
//!     .with_ignore_patterns(&["**/*.test.tsx"]);
//! let result = Scanner::new(config)?.scan()?;
//!
//! println!("Tracked {} files, {} routes", result.context.len(), result.route_count);
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod error;
mod walker;

pub use error::ScanError;
pub use walker::{FileWalker, SKIP_DIRECTORIES};

use std::time::{Duration, Instant};

use camino::{Utf8Path, Utf8PathBuf};
use tr_core::{FileContext, ProjectConfig, is_typed_route};
use tracing::{debug, info};

/// Configuration for the scanner.
///
/// # Examples
///
/// ```
/// use tr_scanner::ScanConfig;
/// use camino::Utf8Path;
///
/// let config = ScanConfig::new(Utf8Path::new("/project/app"))
///     .with_skip_dirs(&["fixtures"]);
/// assert_eq!(config.skip_dirs, vec!["fixtures".to_owned()]);
/// ```
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Root directory to scan.
    pub root: Utf8PathBuf,
    /// Additional directories to skip.
    pub skip_dirs: Vec<String>,
    /// Glob patterns to exclude.
    pub ignore_patterns: Vec<String>,
    /// Whether to follow symbolic links.
    pub follow_links: bool,
}

impl ScanConfig {
    /// Creates a new scan configuration with the given root directory.
    #[must_use]
    pub fn new(root: &Utf8Path) -> Self {
        Self {
            root: root.to_owned(),
            skip_dirs: Vec::new(),
            ignore_patterns: Vec::new(),
            follow_links: false,
        }
    }

    /// Creates a scan configuration for `root` using the project's ignore
    /// patterns.
    #[must_use]
    pub fn from_project(root: &Utf8Path, project: &ProjectConfig) -> Self {
        Self {
            ignore_patterns: project.ignore_patterns.clone(),
            ..Self::new(root)
        }
    }

    /// Adds directories to skip.
    #[must_use]
    pub fn with_skip_dirs(mut self, dirs: &[&str]) -> Self {
        self.skip_dirs.extend(dirs.iter().map(ToString::to_string));
        self
    }

    /// Adds glob patterns to exclude.
    #[must_use]
    pub fn with_ignore_patterns(mut self, patterns: &[&str]) -> Self {
        self.ignore_patterns
            .extend(patterns.iter().map(ToString::to_string));
        self
    }

    /// Configures whether to follow symbolic links.
    #[must_use]
    pub const fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }
}

/// Result of a scan operation.
#[derive(Debug)]
pub struct ScanResult {
    /// Every file found below the root.
    pub context: FileContext,
    /// How many of those files are typed routes.
    pub route_count: usize,
    /// Wall time spent walking.
    pub elapsed: Duration,
}

/// Scans a project root into a [`FileContext`].
#[derive(Debug)]
pub struct Scanner {
    config: ScanConfig,
    walker: FileWalker,
}

impl Scanner {
    /// Creates a new scanner with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Config`] if the root directory doesn't exist and
    /// [`ScanError::Pattern`] if an ignore pattern is invalid.
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        let skip_dirs: Vec<&str> = config.skip_dirs.iter().map(String::as_str).collect();
        let walker = FileWalker::new(&config.root)?
            .with_skip_dirs(&skip_dirs)
            .with_ignore_patterns(&config.ignore_patterns)?
            .with_follow_links(config.follow_links);

        Ok(Self { config, walker })
    }

    /// Walks the root and builds a fresh context.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Walk`] if directory traversal fails.
    pub fn scan(&self) -> Result<ScanResult, ScanError> {
        info!(root = %self.config.root, "Starting scan");
        let started = Instant::now();

        let context = self.walker.collect_context()?;
        let route_count = context
            .keys()
            .filter(|key| is_typed_route(key.basename()))
            .count();
        let elapsed = started.elapsed();

        debug!(
            files = context.len(),
            routes = route_count,
            elapsed_ms = elapsed.as_millis(),
            "Scan complete"
        );

        Ok(ScanResult {
            context,
            route_count,
            elapsed,
        })
    }

    /// Returns the scanner configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &ScanConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_scan_config_new() {
        let config = ScanConfig::new(Utf8Path::new("/project/app"));
        assert_eq!(config.root.as_str(), "/project/app");
        assert!(config.skip_dirs.is_empty());
        assert!(config.ignore_patterns.is_empty());
        assert!(!config.follow_links);
    }

    #[test]
    fn test_scan_config_from_project() {
        let project = ProjectConfig::default();
        let config = ScanConfig::from_project(Utf8Path::new("/project/app"), &project);
        assert_eq!(config.ignore_patterns, project.ignore_patterns);
    }

    #[test]
    fn test_scan_config_with_follow_links() {
        let config = ScanConfig::new(Utf8Path::new("/project/app")).with_follow_links(true);
        assert!(config.follow_links);
    }

    #[test]
    fn test_scanner_invalid_root() {
        let config = ScanConfig::new(Utf8Path::new("/nonexistent/path/that/does/not/exist"));
        let result = Scanner::new(config);
        assert!(result.is_err());
    }

    #[test]
    fn test_scan_counts_routes() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        fs::create_dir_all(root.join("(tabs)")).unwrap();
        for file in ["index.tsx", "_layout.tsx", "(tabs)/route.tsx", "+html.tsx", "logo.png"] {
            fs::write(root.join(file), "").unwrap();
        }

        let result = Scanner::new(ScanConfig::new(&root)).unwrap().scan().unwrap();
        assert_eq!(result.context.len(), 5);
        assert_eq!(result.route_count, 2);
    }
}
