//! Applying filesystem events to a context and its route index.
//!
//! | kind     | context | route index       | regenerate            |
//! |----------|---------|-------------------|-----------------------|
//! | Deleted  | remove  | remove if present | if it was a route     |
//! | Added    | insert  | insert if a route | if it is a route      |
//! | Modified | -       | -                 | if it is in the index |
//!
//! Deleting a path that is not tracked removes every tracked file below it:
//! watchers report a removed or renamed directory as a single event.

use tr_core::{FileContext, FsEvent, FsEventKind};
use tracing::{debug, trace};

use crate::classifier::{Classification, PathClassifier};
use crate::index::RouteIndex;

/// What applying an event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The path is outside the root; nothing was touched.
    Ignored,
    /// The event was applied.
    Applied {
        /// Whether the declaration file needs regenerating.
        regenerate: bool,
    },
}

impl EventOutcome {
    /// Returns `true` if the declaration file needs regenerating.
    #[inline]
    #[must_use]
    pub const fn should_regenerate(self) -> bool {
        matches!(self, Self::Applied { regenerate: true })
    }
}

/// Applies one event to `context` and `routes`.
///
/// Additions are judged by the naming predicate, so re-adding a known route
/// file still asks for regeneration. Deletions and modifications are judged
/// by index membership before the event is applied.
pub fn apply_event(
    classifier: &PathClassifier,
    context: &mut FileContext,
    routes: &mut RouteIndex,
    event: &FsEvent,
) -> EventOutcome {
    let Classification::Inside(classified) = classifier.classify(&event.path) else {
        trace!(path = %event.path, "Ignoring event outside the app root");
        return EventOutcome::Ignored;
    };

    let relative = classified.relative;
    let regenerate = match event.kind {
        FsEventKind::Deleted => {
            let mut was_route = routes.remove(relative.as_str());
            // An untracked path may be a directory that vanished with its files
            if !context.delete(relative.as_str()) {
                for removed in context.delete_dir(relative.as_str()) {
                    was_route |= routes.remove(removed.as_str());
                }
            }
            was_route
        }
        FsEventKind::Added => {
            context.add(relative.clone());
            if classified.is_route_candidate {
                routes.insert(relative.clone());
            }
            classified.is_route_candidate
        }
        FsEventKind::Modified => routes.contains(relative.as_str()),
    };

    debug!(
        path = %relative,
        kind = %event.kind,
        regenerate,
        "Applied file event"
    );
    EventOutcome::Applied { regenerate }
}
