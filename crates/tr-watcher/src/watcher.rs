//! File watcher with async event streaming.
//!
//! This module provides the [`FileWatcher`] type that bridges the synchronous
//! `notify` crate to the async tokio runtime.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                Blocking Thread (spawn_blocking)                  │
//! │  ┌────────────────────┐     ┌──────────────────────────────────┐ │
//! │  │ RecommendedWatcher │ ──► │ Callback (translate, filter,     │ │
//! │  │ (notify)           │     │ expand directories)              │ │
//! │  └────────────────────┘     └────────────────┬─────────────────┘ │
//! └──────────────────────────────────────────────│───────────────────┘
//!                                                │ blocking_send
//!                                                ▼
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                Async Runtime (tokio)                             │
//! │  ┌──────────────────┐    ┌────────────────┐                      │
//! │  │ FileWatcher      │    │ mpsc::Receiver │ ──► WatchSession::run│
//! │  │ (shutdown ctrl)  │    │ (FsEvent)      │                      │
//! │  └──────────────────┘    └────────────────┘                      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Events are not debounced here; the session debounces regeneration.

use camino::{Utf8Path, Utf8PathBuf};
use notify::{RecursiveMode, Watcher};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use tr_core::{FsEvent, FsEventKind, WatchConfig};

use crate::error::WatchError;
use crate::events::translate_event;
use crate::filter::FileFilter;

/// Default channel capacity for file events.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// A file watcher that streams [`FsEvent`]s to an async context.
///
/// # Lifecycle
///
/// 1. **Creation**: [`FileWatcher::new`] validates and canonicalizes the
///    path, then spawns a blocking task owning the notify watcher.
/// 2. **Event Reception**: [`recv`](Self::recv), or hand
///    [`events`](Self::events) to a watch session.
/// 3. **Shutdown**: [`shutdown`](Self::shutdown) for a graceful stop, or
///    drop the watcher, which sends the shutdown signal without waiting.
///
/// # Examples
///
/// ```no_run
/// use tr_watcher::{FileWatcher, SkipDirsFilter};
/// use tr_core::WatchConfig;
/// use camino::Utf8Path;
///
/// # async fn example() -> Result<(), tr_watcher::WatchError> {
/// let mut watcher = FileWatcher::new(
///     Utf8Path::new("./app"),
///     &WatchConfig::default(),
///     SkipDirsFilter::new(&["node_modules"]),
/// ).await?;
///
/// while let Some(event) = watcher.recv().await {
///     println!("{} {}", event.kind, event.path);
/// }
/// # Ok(())
/// # }
/// ```
pub struct FileWatcher {
    /// Shutdown signal sender; `None` once shutdown has been initiated.
    shutdown_tx: Option<oneshot::Sender<()>>,

    /// Handle to the blocking watcher task.
    task_handle: Option<JoinHandle<Result<(), WatchError>>>,

    /// Event receiver for async consumption.
    event_rx: mpsc::Receiver<FsEvent>,

    /// The canonical path being watched.
    watch_path: Utf8PathBuf,
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher")
            .field("watch_path", &self.watch_path)
            .field("is_running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl FileWatcher {
    /// Starts watching `path`.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::PathNotFound`] if the path doesn't exist and
    /// [`WatchError::Io`] if it cannot be canonicalized. Failures of the
    /// notify watcher itself surface from [`shutdown`](Self::shutdown).
    #[allow(clippy::unused_async)] // Async for API consistency with shutdown()
    pub async fn new<F: FileFilter>(
        path: &Utf8Path,
        config: &WatchConfig,
        filter: F,
    ) -> Result<Self, WatchError> {
        Self::with_capacity(path, config, filter, DEFAULT_CHANNEL_CAPACITY).await
    }

    /// Starts watching `path` with a custom channel capacity.
    ///
    /// A full channel blocks the notify thread until the session catches up.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    #[allow(clippy::unused_async)] // Async for API consistency with shutdown()
    pub async fn with_capacity<F: FileFilter>(
        path: &Utf8Path,
        config: &WatchConfig,
        filter: F,
        channel_capacity: usize,
    ) -> Result<Self, WatchError> {
        if !path.exists() {
            return Err(WatchError::path_not_found(path));
        }

        let watch_path = path.canonicalize_utf8()?;

        let (event_tx, event_rx) = mpsc::channel(channel_capacity);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task_path = watch_path.clone();
        let recursive = config.recursive;

        let task_handle = tokio::task::spawn_blocking(move || {
            run_watcher_loop(task_path, recursive, event_tx, shutdown_rx, filter)
        });

        Ok(Self {
            shutdown_tx: Some(shutdown_tx),
            task_handle: Some(task_handle),
            event_rx,
            watch_path,
        })
    }

    /// Receives the next event.
    ///
    /// Returns `None` once the watcher has stopped.
    pub async fn recv(&mut self) -> Option<FsEvent> {
        self.event_rx.recv().await
    }

    /// Returns the event receiver, for a watch session's `run` loop or
    /// `tokio::select!`.
    pub fn events(&mut self) -> &mut mpsc::Receiver<FsEvent> {
        &mut self.event_rx
    }

    /// Returns the canonical path being watched.
    #[must_use]
    pub fn watch_path(&self) -> &Utf8Path {
        &self.watch_path
    }

    /// Returns `true` if the watcher task is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some() && self.task_handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stops the watcher and waits for its task to finish.
    ///
    /// # Errors
    ///
    /// Returns the watcher task's error, or [`WatchError::ChannelClosed`] if
    /// the task panicked.
    pub async fn shutdown(mut self) -> Result<(), WatchError> {
        if let Some(tx) = self.shutdown_tx.take() {
            // Receiver is gone if the task already failed
            let _ = tx.send(());
        }

        if let Some(handle) = self.task_handle.take() {
            match handle.await {
                Ok(result) => result?,
                Err(_join_error) => return Err(WatchError::ChannelClosed),
            }
        }

        Ok(())
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Runs the notify watcher until the shutdown signal arrives.
#[allow(clippy::needless_pass_by_value)] // Owned for the blocking task lifetime
fn run_watcher_loop<F: FileFilter>(
    path: Utf8PathBuf,
    recursive: bool,
    event_tx: mpsc::Sender<FsEvent>,
    shutdown_rx: oneshot::Receiver<()>,
    filter: F,
) -> Result<(), WatchError> {
    let root = path.clone();
    let mut watcher =
        notify::recommended_watcher(move |res: notify::Result<notify::Event>| match res {
            Ok(event) => forward(event, &root, &filter, &event_tx),
            Err(error) => warn!(error = %error, "Watcher error"),
        })?;

    let mode = if recursive {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };
    watcher.watch(path.as_std_path(), mode)?;

    info!(path = %path, recursive, "File watcher started");

    let _ = shutdown_rx.blocking_recv();

    info!(path = %path, "File watcher stopped");
    Ok(())
}

/// Translates, filters and sends one notify event.
fn forward<F: FileFilter>(
    event: notify::Event,
    root: &Utf8Path,
    filter: &F,
    tx: &mpsc::Sender<FsEvent>,
) {
    for (path, kind) in translate_event(event) {
        let path = match Utf8PathBuf::try_from(path) {
            Ok(path) => path,
            Err(e) => {
                let invalid_path = e.into_path_buf();
                warn!(
                    path = %invalid_path.display(),
                    "Skipping non-UTF-8 path in file event"
                );
                continue;
            }
        };

        if !accepts(filter, root, &path) {
            trace!(path = %path, "Filtered out file event");
            continue;
        }

        for event in expand(path, kind, root, filter) {
            if tx.blocking_send(event).is_err() {
                debug!("Event channel closed, dropping file events");
                return;
            }
        }
    }
}

/// Turns a directory event into events for the files it holds.
///
/// An added directory (created or moved into place) becomes one `Added` per
/// file below it; a modified directory is dropped. Deleted paths are passed
/// through as is, since there is nothing left on disk to inspect.
fn expand<F: FileFilter>(
    path: Utf8PathBuf,
    kind: FsEventKind,
    root: &Utf8Path,
    filter: &F,
) -> Vec<FsEvent> {
    if kind == FsEventKind::Deleted || !path.is_dir() {
        return vec![FsEvent::new(path, kind)];
    }
    if kind == FsEventKind::Modified {
        return Vec::new();
    }

    let mut files = Vec::new();
    collect_files(&path, root, filter, &mut files);
    files.into_iter().map(FsEvent::added).collect()
}

fn collect_files<F: FileFilter>(
    dir: &Utf8Path,
    root: &Utf8Path,
    filter: &F,
    files: &mut Vec<Utf8PathBuf>,
) {
    let Ok(entries) = dir.read_dir_utf8() else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !accepts(filter, root, path) {
            continue;
        }
        match entry.file_type() {
            Ok(file_type) if file_type.is_dir() => collect_files(path, root, filter, files),
            Ok(file_type) if file_type.is_file() => files.push(path.to_owned()),
            _ => {}
        }
    }
}

/// Runs `filter` on the part of `path` below the watch root.
fn accepts<F: FileFilter>(filter: &F, root: &Utf8Path, path: &Utf8Path) -> bool {
    filter.should_process(path.strip_prefix(root).unwrap_or(path))
}
