//! Route file parsing and href expansion.
//!
//! A route file path such as `./(tabs,home)/users/[id].tsx` is split into
//! segments and expanded into every href it can be reached by:
//!
//! ```text
//! ./(tabs,home)/users/[id].tsx
//!        │
//!        ▼
//! [Group(tabs, home), Static(users), Dynamic(id)]
//!        │
//!        ├── /users/[id]            (groups omitted)
//!        ├── /(tabs)/users/[id]
//!        └── /(home)/users/[id]
//! ```

use std::fmt::Write as _;

use smallvec::SmallVec;
use tr_core::{GenerateOptions, RelativePath, route_extension};

use crate::error::GenerateError;

/// File stem that maps to its parent directory's href.
const INDEX_STEM: &str = "index";

/// One path segment of a route file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A literal path component.
    Static(String),
    /// A layout group such as `(tabs)` or `(a,b)`; never required in an href.
    Group(SmallVec<[String; 2]>),
    /// A single dynamic component such as `[id]`.
    Dynamic(String),
    /// A catch-all component such as `[...rest]`.
    CatchAll(String),
}

impl Segment {
    fn parse(raw: &str, file: &RelativePath) -> Result<Self, GenerateError> {
        let invalid = || GenerateError::invalid_segment(file.as_str(), raw);

        if raw.is_empty() {
            return Err(invalid());
        }

        if let Some(inner) = raw.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
            let names: SmallVec<[String; 2]> =
                inner.split(',').map(|name| name.trim().to_owned()).collect();
            if names.iter().any(String::is_empty) {
                return Err(invalid());
            }
            return Ok(Self::Group(names));
        }

        if let Some(name) = raw.strip_prefix("[...").and_then(|s| s.strip_suffix(']')) {
            if name.is_empty() {
                return Err(invalid());
            }
            return Ok(Self::CatchAll(name.to_owned()));
        }

        if let Some(name) = raw.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            if name.is_empty() {
                return Err(invalid());
            }
            return Ok(Self::Dynamic(name.to_owned()));
        }

        Ok(Self::Static(raw.to_owned()))
    }
}

/// A resolved href component, borrowed from a [`RoutePattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part<'a> {
    Static(&'a str),
    Group(&'a str),
    Dynamic(&'a str),
    CatchAll(&'a str),
}

/// How dynamic components are written when rendering an href.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HrefStyle {
    /// Bracket form: `/users/[id]`.
    Template,
    /// TypeScript template literal form:
    /// `/users/${Router.SingleRoutePart<T>}`.
    Typed,
}

/// The parsed form of one route file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    file: RelativePath,
    segments: SmallVec<[Segment; 8]>,
}

impl RoutePattern {
    /// Parses a route file path.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::NotARoute`] if the file has no route
    /// extension and [`GenerateError::InvalidSegment`] for malformed
    /// segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use tr_core::RelativePath;
    /// use tr_typegen::{HrefStyle, RoutePattern};
    ///
    /// let pattern = RoutePattern::parse(&RelativePath::new("(tabs)/users/[id].tsx")).unwrap();
    /// assert!(pattern.is_dynamic());
    /// assert_eq!(pattern.claimed_hrefs(), vec!["/(tabs)/users/[id]"]);
    /// ```
    pub fn parse(file: &RelativePath) -> Result<Self, GenerateError> {
        let ext = route_extension(file.basename())
            .ok_or_else(|| GenerateError::NotARoute(file.to_string()))?;

        let path = file.without_marker();
        let stem = &path[..path.len() - ext.len() - 1];

        let mut raw: SmallVec<[&str; 8]> = stem.split('/').collect();
        if raw.last() == Some(&INDEX_STEM) {
            raw.pop();
        }

        let segments = raw
            .into_iter()
            .map(|segment| Segment::parse(segment, file))
            .collect::<Result<_, _>>()?;

        Ok(Self {
            file: file.clone(),
            segments,
        })
    }

    /// Returns the route file this pattern was parsed from.
    #[inline]
    #[must_use]
    pub fn file(&self) -> &RelativePath {
        &self.file
    }

    /// Returns the parsed segments.
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns `true` if any segment is dynamic or catch-all.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Dynamic(_) | Segment::CatchAll(_)))
    }

    /// Returns the hrefs that name this file alone, in bracket form.
    ///
    /// These keep every group segment (one member each); without groups it
    /// is the single plain href. Two route files sharing one of them cannot
    /// coexist, while files that only meet once groups are dropped, such as
    /// `(home)/[user]` and `(search)/[user]`, can.
    #[must_use]
    pub fn claimed_hrefs(&self) -> Vec<String> {
        let mut hrefs: Vec<String> = self
            .expand(false, true)
            .iter()
            .map(|parts| render(parts, HrefStyle::Template))
            .collect();
        hrefs.sort();
        hrefs.dedup();
        hrefs
    }

    /// Returns every href this route answers to, rendered in `style`.
    ///
    /// The href with every group dropped is always included. Without
    /// `partial_typed_groups`, the only other forms keep every group
    /// segment (one member each); with it, any subset of group segments may
    /// appear.
    #[must_use]
    pub fn hrefs(&self, options: &GenerateOptions, style: HrefStyle) -> Vec<String> {
        let variants = if options.partial_typed_groups {
            self.expand(true, true)
        } else {
            let mut variants = self.expand(true, false);
            variants.extend(self.expand(false, true));
            variants
        };

        let mut hrefs: Vec<String> = variants.iter().map(|parts| render(parts, style)).collect();
        hrefs.sort();
        hrefs.dedup();
        hrefs
    }

    fn expand(&self, allow_omit: bool, allow_include: bool) -> Vec<Vec<Part<'_>>> {
        let mut variants: Vec<Vec<Part<'_>>> = vec![Vec::new()];

        for segment in &self.segments {
            let Segment::Group(names) = segment else {
                if let Some(part) = resolve(segment) {
                    for variant in &mut variants {
                        variant.push(part);
                    }
                }
                continue;
            };

            let mut next = Vec::with_capacity(variants.len() * (names.len() + 1));
            for variant in &variants {
                if allow_omit {
                    next.push(variant.clone());
                }
                if allow_include {
                    for name in names {
                        let mut included = variant.clone();
                        included.push(Part::Group(name));
                        next.push(included);
                    }
                }
            }
            variants = next;
        }

        variants
    }
}

/// Resolves a non-group segment; groups have no single resolution.
fn resolve(segment: &Segment) -> Option<Part<'_>> {
    match segment {
        Segment::Static(name) => Some(Part::Static(name)),
        Segment::Group(_) => None,
        Segment::Dynamic(name) => Some(Part::Dynamic(name)),
        Segment::CatchAll(name) => Some(Part::CatchAll(name)),
    }
}

fn render(parts: &[Part<'_>], style: HrefStyle) -> String {
    if parts.is_empty() {
        return "/".to_owned();
    }

    let mut href = String::new();
    for part in parts {
        href.push('/');
        match (part, style) {
            (Part::Static(name), HrefStyle::Template) => href.push_str(name),
            (Part::Static(name), HrefStyle::Typed) => href.push_str(&escape_template(name)),
            (Part::Group(name), _) => {
                let _ = write!(href, "({name})");
            }
            (Part::Dynamic(name), HrefStyle::Template) => {
                let _ = write!(href, "[{name}]");
            }
            (Part::CatchAll(name), HrefStyle::Template) => {
                let _ = write!(href, "[...{name}]");
            }
            (Part::Dynamic(_), HrefStyle::Typed) => {
                href.push_str("${Router.SingleRoutePart<T>}");
            }
            (Part::CatchAll(_), HrefStyle::Typed) => {
                href.push_str("${Router.CatchAllRoutePart<T>}");
            }
        }
    }
    href
}

/// Escapes text placed inside a TypeScript template literal.
pub(crate) fn escape_template(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(path: &str) -> RoutePattern {
        RoutePattern::parse(&RelativePath::new(path)).unwrap()
    }

    fn template_hrefs(path: &str, partial: bool) -> Vec<String> {
        let options = GenerateOptions {
            partial_typed_groups: partial,
        };
        parse(path).hrefs(&options, HrefStyle::Template)
    }

    #[test]
    fn test_parse_segments() {
        let pattern = parse("(tabs,home)/users/[id]/[...rest].tsx");
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Group(SmallVec::from_vec(vec!["tabs".to_owned(), "home".to_owned()])),
                Segment::Static("users".to_owned()),
                Segment::Dynamic("id".to_owned()),
                Segment::CatchAll("rest".to_owned()),
            ]
        );
    }

    #[test]
    fn test_index_maps_to_parent() {
        assert_eq!(parse("index.tsx").claimed_hrefs(), vec!["/"]);
        assert_eq!(parse("settings/index.tsx").claimed_hrefs(), vec!["/settings"]);
    }

    #[test]
    fn test_claimed_hrefs_keep_groups() {
        assert_eq!(parse("(tabs)/route.tsx").claimed_hrefs(), vec!["/(tabs)/route"]);
        assert_eq!(
            parse("(tabs,test)/route.tsx").claimed_hrefs(),
            vec!["/(tabs)/route", "/(test)/route"]
        );
        assert_eq!(parse("(auth)/index.tsx").claimed_hrefs(), vec!["/(auth)"]);
    }

    #[test]
    fn test_invalid_segments() {
        for path in ["()/index.tsx", "(a,)/index.tsx", "users/[].tsx", "[...].tsx"] {
            let result = RoutePattern::parse(&RelativePath::new(path));
            assert!(
                matches!(result, Err(GenerateError::InvalidSegment { .. })),
                "{path} should be rejected"
            );
        }
    }

    #[test]
    fn test_not_a_route() {
        let result = RoutePattern::parse(&RelativePath::new("logo.png"));
        assert!(matches!(result, Err(GenerateError::NotARoute(_))));
    }

    #[test]
    fn test_hrefs_without_groups() {
        assert_eq!(template_hrefs("about.tsx", false), vec!["/about"]);
    }

    #[test]
    fn test_hrefs_all_or_nothing_groups() {
        assert_eq!(
            template_hrefs("(a,b)/(c)/page.tsx", false),
            vec!["/(a)/(c)/page", "/(b)/(c)/page", "/page"]
        );
    }

    #[test]
    fn test_hrefs_partial_groups() {
        assert_eq!(
            template_hrefs("(a)/(c)/page.tsx", true),
            vec!["/(a)/(c)/page", "/(a)/page", "/(c)/page", "/page"]
        );
    }

    #[test]
    fn test_typed_style() {
        let hrefs = parse("users/[id]/[...rest].tsx")
            .hrefs(&GenerateOptions::default(), HrefStyle::Typed);
        assert_eq!(
            hrefs,
            vec!["/users/${Router.SingleRoutePart<T>}/${Router.CatchAllRoutePart<T>}"]
        );
    }

    #[test]
    fn test_escape_template() {
        assert_eq!(escape_template("a`b"), "a\\`b");
        assert_eq!(escape_template("${x}"), "\\${x}");
    }
}
