//! Configuration structures for typed-routes.
//!
//! - [`ProjectConfig`] - where the routes live and what the scan ignores
//! - [`WatchConfig`] - quiescence interval and recursion for watch sessions
//! - [`TypegenConfig`] - where the declaration file goes and how it is typed
//! - [`Config`] - root configuration combining all settings
//!
//! All configuration types implement [`Default`] and deserialize with
//! missing fields filled from those defaults.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the generated declaration artifact, relative to the output
/// directory.
pub const DECLARATION_FILE_NAME: &str = "router.d.ts";

/// Options passed to the declaration generator.
///
/// # Examples
///
/// ```
/// use tr_core::GenerateOptions;
///
/// assert!(!GenerateOptions::default().partial_typed_groups);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Allow any subset of a route's group segments in typed hrefs, instead of
    /// only "all groups" or "no groups".
    pub partial_typed_groups: bool,
}

/// Configuration for the project being indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Absolute path of the routes directory.
    ///
    /// `None` leaves every watch session inert.
    pub app_root: Option<Utf8PathBuf>,

    /// Glob patterns excluded from the initial scan.
    pub ignore_patterns: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            app_root: None,
            ignore_patterns: vec![
                "**/node_modules/**".to_owned(),
                "**/.expo/**".to_owned(),
                "**/*.d.ts".to_owned(),
            ],
        }
    }
}

/// Configuration for watch sessions.
///
/// # Examples
///
/// ```
/// use tr_core::WatchConfig;
///
/// let config = WatchConfig::default();
/// assert_eq!(config.debounce_ms, 1000);
/// assert!(config.recursive);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Quiescence interval in milliseconds.
    ///
    /// Regeneration runs once no further qualifying event has arrived for
    /// this long.
    pub debounce_ms: u64,

    /// Whether to watch subdirectories recursively.
    pub recursive: bool,
}

impl WatchConfig {
    /// Returns the quiescence interval as a [`Duration`].
    #[inline]
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 1000,
            recursive: true,
        }
    }
}

/// Configuration for declaration generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypegenConfig {
    /// Directory receiving [`DECLARATION_FILE_NAME`].
    pub output_dir: Utf8PathBuf,

    /// See [`GenerateOptions::partial_typed_groups`].
    pub partial_typed_groups: bool,
}

impl TypegenConfig {
    /// Returns the generator options described by this configuration.
    #[inline]
    #[must_use]
    pub const fn options(&self) -> GenerateOptions {
        GenerateOptions {
            partial_typed_groups: self.partial_typed_groups,
        }
    }

    /// Returns the full path of the declaration artifact.
    #[must_use]
    pub fn declaration_path(&self) -> Utf8PathBuf {
        self.output_dir.join(DECLARATION_FILE_NAME)
    }
}

impl Default for TypegenConfig {
    fn default() -> Self {
        Self {
            output_dir: Utf8PathBuf::from("."),
            partial_typed_groups: false,
        }
    }
}

/// Root configuration for typed-routes.
///
/// # Examples
///
/// ```
/// use tr_core::Config;
///
/// let config: Config = serde_json::from_str(r#"{"watch": {"debounce_ms": 50}}"#).unwrap();
/// assert_eq!(config.watch.debounce_ms, 50);
/// assert!(config.project.app_root.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project configuration.
    pub project: ProjectConfig,

    /// Watch session configuration.
    pub watch: WatchConfig,

    /// Declaration generation configuration.
    pub typegen: TypegenConfig,
}

impl Config {
    /// Loads a configuration from a JSON file.
    ///
    /// Fields missing from the file take their default values.
    pub fn from_json_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Checks the configuration for values no session can run with.
    ///
    /// An unset app root is valid: sessions built from it are inert.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(root) = &self.project.app_root {
            if !root.is_absolute() {
                return Err(ConfigError::InvalidPath {
                    path: root.clone(),
                    reason: "app root must be absolute".to_owned(),
                });
            }
            if !root.is_dir() {
                return Err(ConfigError::MissingDirectory(root.clone()));
            }
        }

        if self.watch.debounce_ms == 0 {
            return Err(ConfigError::invalid_option(
                "watch.debounce_ms",
                "must be greater than zero",
            ));
        }

        Ok(())
    }
}
