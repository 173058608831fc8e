//! Incremental watch sessions for typed routes.
//!
//! A [`WatchSession`] keeps `router.d.ts` in sync with the route files below
//! an app root. It is seeded by one full scan and then kept current by
//! filesystem events, one at a time:
//!
//! ```text
//! FsEvent ──► PathClassifier ──► apply_event ──► DebouncedRegenerator
//!              (inside root?)     (FileContext,    (quiet for one interval?)
//!                                  RouteIndex)              │
//!                                                           ▼
//!                                             DeclarationGenerator ──► router.d.ts
//! ```
//!
//! Nothing in the pipeline is fatal: paths outside the root are ignored,
//! non-route files never trigger regeneration, and generator or write
//! failures are logged and dropped. The next qualifying event tries again.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use camino::Utf8PathBuf;
//! use tr_core::{FileContext, FsEvent, RelativePath};
//! use tr_session::WatchSession;
//! use tr_typegen::TypedRoutesGenerator;
//!
//! let context = FileContext::from_keys("/project/app", [RelativePath::new("index.tsx")]);
//! let mut session = WatchSession::from_parts(
//!     Some(Utf8PathBuf::from("/project/app")),
//!     context,
//!     Utf8PathBuf::from("/project"),
//!     Duration::from_millis(1000),
//!     TypedRoutesGenerator,
//! );
//!
//! // Not a route file: tracked, but nothing to regenerate
//! assert!(!session.handle_event(&FsEvent::added("/project/app/_layout.tsx")));
//! // Outside the app root: ignored entirely
//! assert!(!session.handle_event(&FsEvent::added("/project/lib/util.ts")));
//! assert_eq!(session.context().len(), 2);
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod classifier;
mod error;
mod handler;
mod index;
mod regenerator;
mod session;

pub use classifier::{Classification, ClassifiedPath, PathClassifier};
pub use error::{RegenerateError, SessionError};
pub use handler::{EventOutcome, apply_event};
pub use index::RouteIndex;
pub use regenerator::{DebouncedRegenerator, RegenerationOutcome};
pub use session::{SessionState, SessionStats, WatchSession};
