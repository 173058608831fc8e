//! Domain types shared by every stage of the pipeline.
//!
//! - [`path`] - root-relative paths
//! - [`event`] - filesystem events consumed by a watch session
//! - [`context`] - the relative path to module loader mapping
//!
//! All public types are re-exported at the crate root:
//!
//! ```
//! use tr_core::{FileContext, FsEvent, FsEventKind, RelativePath};
//! ```

mod context;
mod event;
mod path;

pub use context::{FileContext, ModuleLoader};
pub use event::{FsEvent, FsEventKind};
pub use path::{ROOT_MARKER, RelativePath};
