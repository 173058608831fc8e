//! Typed-routes declaration generation.
//!
//! Turns a [`FileContext`](tr_core::FileContext) into the text of
//! `router.d.ts`: a module augmentation for `expo-router` listing every
//! static href, every dynamic href, and the bracket templates of the latter.
//!
//! # Overview
//!
//! - [`DeclarationGenerator`]: the seam a watch session regenerates through
//! - [`TypedRoutesGenerator`]: the default generator
//! - [`RoutePattern`]: one route file parsed into [`Segment`]s
//! - [`RouteTable`]: the sorted href sets of a whole route tree
//!
//! # Example
//!
//! ```
//! use camino::Utf8PathBuf;
//! use tr_core::{FileContext, GenerateOptions, RelativePath};
//! use tr_typegen::{DeclarationGenerator, TypedRoutesGenerator};
//!
//! let context = FileContext::from_keys(
//!     Utf8PathBuf::from("/project/app"),
//!     [RelativePath::new("users/[id].tsx")],
//! );
//! let text = TypedRoutesGenerator
//!     .generate(&context, &GenerateOptions::default())
//!     .unwrap()
//!     .unwrap();
//! assert!(text.contains("DynamicRouteTemplate: `/users/[id]`;"));
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod error;
mod generator;
mod route;

pub use error::GenerateError;
pub use generator::{DeclarationGenerator, RouteTable, TypedRoutesGenerator};
pub use route::{HrefStyle, RoutePattern, Segment};
