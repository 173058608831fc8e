//! Core types, configuration, and route matching for typed-routes.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - [`RelativePath`] - root-relative paths carrying the `./` marker
//! - [`FileContext`] - the mapping from relative path to module loader
//! - [`FsEvent`] - filesystem events handed to a watch session
//! - [`is_typed_route`] - the single route-file naming predicate
//! - Configuration structures ([`Config`], [`GenerateOptions`], ...)
//! - Type aliases for `FxHashMap`/`FxHashSet` (faster than std)
//!
//! # Crate Dependencies
//!
//! ```text
//! tr-cli ──► tr-session ──► tr-scanner ──► tr-core
//!        │              └─► tr-typegen ──►
//!        └─► tr-watcher ─────────────────►
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash;
pub mod matcher;
pub mod types;

pub use config::{
    Config, DECLARATION_FILE_NAME, GenerateOptions, ProjectConfig, TypegenConfig, WatchConfig,
};
pub use error::{ConfigError, ContextError};
pub use hash::{FxHashMap, FxHashSet};
pub use matcher::{is_typed_route, route_extension};
pub use types::{FileContext, FsEvent, FsEventKind, ModuleLoader, RelativePath};
