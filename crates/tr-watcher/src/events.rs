//! Translation of notify events into session events.
//!
//! # Event Flow
//!
//! ```text
//! notify::Event (kind + paths)
//!        │
//!        ▼
//!   translate_event ──► (path, FsEventKind) pairs
//!        │
//!        ▼
//!   UTF-8 check, filter, directory expansion (watcher thread)
//!        │
//!        ▼
//!   FsEvent sent to the session
//! ```

use std::path::PathBuf;

use notify::EventKind;
use notify::event::{ModifyKind, RenameMode};
use smallvec::SmallVec;
use tr_core::FsEventKind;

/// Paths touched by one notify event, with what happened to each.
pub type Changes = SmallVec<[(PathBuf, FsEventKind); 2]>;

/// Maps a notify event onto [`FsEventKind`]s.
///
/// | notify kind                 | result                          |
/// |-----------------------------|---------------------------------|
/// | create                      | `Added`                         |
/// | remove                      | `Deleted`                       |
/// | rename (from)               | `Deleted`                       |
/// | rename (to)                 | `Added`                         |
/// | rename (both)               | `Deleted` old path, `Added` new |
/// | rename (unknown side)       | `Added` if the path exists, else `Deleted` |
/// | data or unspecified modify  | `Modified`                      |
/// | metadata, access, other     | dropped                         |
///
/// # Examples
///
/// ```
/// use notify::event::{CreateKind, Event, EventKind};
/// use tr_core::FsEventKind;
/// use tr_watcher::translate_event;
///
/// let event = Event::new(EventKind::Create(CreateKind::File)).add_path("/app/index.tsx".into());
/// let changes = translate_event(event);
/// assert_eq!(changes[0].1, FsEventKind::Added);
/// ```
#[must_use]
pub fn translate_event(event: notify::Event) -> Changes {
    let kind = match event.kind {
        EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            FsEventKind::Added
        }
        EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            FsEventKind::Deleted
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            let mut paths = event.paths.into_iter();
            let mut changes = Changes::new();
            if let Some(from) = paths.next() {
                changes.push((from, FsEventKind::Deleted));
            }
            if let Some(to) = paths.next() {
                changes.push((to, FsEventKind::Added));
            }
            return changes;
        }
        // Some backends cannot tell which side of a rename they saw
        EventKind::Modify(ModifyKind::Name(_)) => {
            return event
                .paths
                .into_iter()
                .map(|path| {
                    let kind = if path.exists() {
                        FsEventKind::Added
                    } else {
                        FsEventKind::Deleted
                    };
                    (path, kind)
                })
                .collect();
        }
        EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any) => FsEventKind::Modified,
        // Metadata, access and unclassified events
        _ => return Changes::new(),
    };

    event.paths.into_iter().map(|path| (path, kind)).collect()
}
