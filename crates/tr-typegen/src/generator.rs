//! Declaration generators.
//!
//! A [`DeclarationGenerator`] turns the current [`FileContext`] into the text
//! of `router.d.ts`, or `None` when there is nothing to declare.
//! [`TypedRoutesGenerator`] is the default implementation; any closure with
//! the right signature works too, which is how tests inject failures.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use tr_core::{FileContext, FxHashMap, GenerateOptions, RelativePath, is_typed_route};
use tracing::debug;

use crate::error::GenerateError;
use crate::route::{HrefStyle, RoutePattern, escape_template};

/// Produces the declaration file for a file context.
///
/// Implementations must be idempotent: the same context and options always
/// yield the same text.
pub trait DeclarationGenerator {
    /// Generates the declaration text.
    ///
    /// Returns `Ok(None)` when there is nothing to write. An existing file
    /// is left untouched in that case.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerateError`] when the route tree cannot be typed.
    fn generate(
        &self,
        context: &FileContext,
        options: &GenerateOptions,
    ) -> Result<Option<String>, GenerateError>;
}

impl<F> DeclarationGenerator for F
where
    F: Fn(&FileContext, &GenerateOptions) -> Result<Option<String>, GenerateError>,
{
    fn generate(
        &self,
        context: &FileContext,
        options: &GenerateOptions,
    ) -> Result<Option<String>, GenerateError> {
        self(context, options)
    }
}

/// Generates an `expo-router` module augmentation listing every href.
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
/// use tr_core::{FileContext, GenerateOptions, RelativePath};
/// use tr_typegen::{DeclarationGenerator, TypedRoutesGenerator};
///
/// let context = FileContext::from_keys(
///     Utf8PathBuf::from("/project/app"),
///     [RelativePath::new("index.tsx"), RelativePath::new("about.tsx")],
/// );
///
/// let text = TypedRoutesGenerator
///     .generate(&context, &GenerateOptions::default())
///     .unwrap()
///     .unwrap();
/// assert!(text.contains("StaticRoutes: `/` | `/about`;"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TypedRoutesGenerator;

impl DeclarationGenerator for TypedRoutesGenerator {
    fn generate(
        &self,
        context: &FileContext,
        options: &GenerateOptions,
    ) -> Result<Option<String>, GenerateError> {
        let table = RouteTable::build(context, options)?;
        if table.is_empty() {
            debug!(files = context.len(), "No route files, nothing to generate");
            return Ok(None);
        }

        debug!(
            static_routes = table.static_routes.len(),
            dynamic_routes = table.dynamic_routes.len(),
            "Generated route table"
        );
        Ok(Some(table.render()))
    }
}

/// The sorted href sets of a route tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    static_routes: BTreeSet<String>,
    dynamic_routes: BTreeSet<String>,
    dynamic_templates: BTreeSet<String>,
}

impl RouteTable {
    /// Collects the hrefs of every route file in `context`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::ConflictingRoutes`] if two files claim the
    /// same href (see [`RoutePattern::claimed_hrefs`]) and
    /// [`GenerateError::InvalidSegment`] for malformed path segments.
    pub fn build(context: &FileContext, options: &GenerateOptions) -> Result<Self, GenerateError> {
        let mut table = Self::default();
        let mut claimed: FxHashMap<String, &RelativePath> = FxHashMap::default();

        for file in context.keys().filter(|key| is_typed_route(key.basename())) {
            let pattern = RoutePattern::parse(file)?;

            for href in pattern.claimed_hrefs() {
                if let Some(first) = claimed.insert(href.clone(), file) {
                    return Err(GenerateError::ConflictingRoutes {
                        href,
                        first: first.to_string(),
                        second: file.to_string(),
                    });
                }
            }

            if pattern.is_dynamic() {
                table
                    .dynamic_routes
                    .extend(pattern.hrefs(options, HrefStyle::Typed));
                table
                    .dynamic_templates
                    .extend(pattern.hrefs(options, HrefStyle::Template));
            } else {
                table
                    .static_routes
                    .extend(pattern.hrefs(options, HrefStyle::Template));
            }
        }

        Ok(table)
    }

    /// Returns `true` if no route was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.static_routes.is_empty() && self.dynamic_routes.is_empty()
    }

    /// Hrefs without dynamic parts.
    pub fn static_routes(&self) -> impl Iterator<Item = &str> + '_ {
        self.static_routes.iter().map(String::as_str)
    }

    /// Hrefs with dynamic parts, in bracket form.
    pub fn dynamic_templates(&self) -> impl Iterator<Item = &str> + '_ {
        self.dynamic_templates.iter().map(String::as_str)
    }

    /// Renders the declaration file.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(512);
        out.push_str("/* eslint-disable */\n");
        out.push_str("import * as Router from 'expo-router';\n\n");
        out.push_str("export * from 'expo-router';\n\n");
        out.push_str("declare module 'expo-router' {\n");
        out.push_str("  export namespace ExpoRouter {\n");
        out.push_str("    export interface __routes<T extends string | object = string> {\n");
        let _ = writeln!(
            out,
            "      StaticRoutes: {};",
            union(self.static_routes.iter().map(|href| escape_template(href)))
        );
        // Typed hrefs are escaped segment by segment when rendered
        let _ = writeln!(
            out,
            "      DynamicRoutes: {};",
            union(self.dynamic_routes.iter().cloned())
        );
        let _ = writeln!(
            out,
            "      DynamicRouteTemplate: {};",
            union(self.dynamic_templates.iter().map(|href| escape_template(href)))
        );
        out.push_str("    }\n");
        out.push_str("  }\n");
        out.push_str("}\n");
        out
    }
}

/// Joins template literal bodies into a union type, `never` when empty.
fn union(members: impl Iterator<Item = String>) -> String {
    let members: Vec<String> = members.map(|member| format!("`{member}`")).collect();
    if members.is_empty() {
        "never".to_owned()
    } else {
        members.join(" | ")
    }
}
