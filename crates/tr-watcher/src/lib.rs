//! Filesystem watching for typed-routes watch sessions.
//!
//! This crate turns raw `notify` events into [`FsEvent`]s and streams them to
//! the async runtime over a bounded channel, where a watch session consumes
//! them.
//!
//! # Overview
//!
//! - [`translate_event`]: maps one notify event to `(path, kind)` pairs,
//!   splitting renames into a deletion and an addition
//! - [`FileFilter`]: decides which paths are forwarded at all
//! - [`FileWatcher`]: owns the notify watcher on a blocking thread and
//!   exposes the event receiver
//!
//! Directory events are expanded before they leave the watcher: a directory
//! moved into place yields one `Added` per file inside it. A directory that
//! disappears is reported once, by its own path, and the session drops every
//! tracked file below it.
//!
//! # Usage
//!
//! ```no_run
//! use tr_watcher::{FileWatcher, SkipDirsFilter};
//! use tr_core::WatchConfig;
//! use camino::Utf8Path;
//! use tokio::time::{Duration, interval};
//!
//! # async fn example() -> Result<(), tr_watcher::WatchError> {
//! let mut watcher = FileWatcher::new(
//!     Utf8Path::new("./app"),
//!     &WatchConfig::default(),
//!     SkipDirsFilter::new(&["node_modules", ".expo"]),
//! ).await?;
//!
//! let mut tick = interval(Duration::from_secs(5));
//!
//! loop {
//!     tokio::select! {
//!         Some(event) = watcher.recv() => {
//!             println!("{} {}", event.kind, event.path);
//!         }
//!         _ = tick.tick() => {}
//!     }
//! }
//! # }
//! ```
//!
//! # Error Handling
//!
//! ```
//! use tr_watcher::WatchError;
//!
//! fn handle_watch_error(err: &WatchError) -> bool {
//!     // Keep going unless the watcher cannot recover
//!     !err.is_fatal()
//! }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod events;
pub mod filter;
pub mod watcher;

pub use error::WatchError;
pub use events::{Changes, translate_event};
pub use filter::{AcceptAllFilter, CompositeFilter, FileFilter, SkipDirsFilter};
pub use tr_core::{FsEvent, FsEventKind};
pub use watcher::{DEFAULT_CHANNEL_CAPACITY, FileWatcher};
