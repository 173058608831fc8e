//! Route-file naming convention.
//!
//! [`is_typed_route`] is the one place that decides whether a file name
//! defines a navigable route. The scanner, the route index, the event
//! classifier and the declaration generator all call it; none of them carry
//! their own copy of the rules.
//!
//! # Examples
//!
//! ```
//! use tr_core::is_typed_route;
//!
//! assert!(is_typed_route("index.tsx"));
//! assert!(is_typed_route("[id].ts"));
//! assert!(!is_typed_route("_layout.tsx"));
//! assert!(!is_typed_route("+api.ts"));
//! assert!(!is_typed_route("styles.css"));
//! ```

/// Source extensions a route file may use, without the leading dot.
const ROUTE_EXTENSIONS: &[&str] = &["tsx", "ts", "jsx", "js"];

/// Stem of layout files, which wrap routes but are not routes themselves.
const LAYOUT_STEM: &str = "_layout";

/// Returns the route source extension of `file_name`, if it has one.
///
/// Matching is case-sensitive: `Index.TSX` has no route extension.
///
/// # Examples
///
/// ```
/// use tr_core::route_extension;
///
/// assert_eq!(route_extension("index.tsx"), Some("tsx"));
/// assert_eq!(route_extension("about.js"), Some("js"));
/// assert_eq!(route_extension("README.md"), None);
/// ```
#[must_use]
pub fn route_extension(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    ROUTE_EXTENSIONS
        .iter()
        .copied()
        .find(|candidate| *candidate == ext)
}

/// Returns `true` if a file with this base name is a typed route.
///
/// A typed route has a `.ts`, `.tsx`, `.js` or `.jsx` extension, is not a
/// declaration file, is not a layout, and has no `+` in its stem (`+api`,
/// `+html` and `+not-found` files are handled outside the typed href set).
///
/// The argument is a base name. Passing a path with directories still works
/// for the extension and `+` rules but will not recognize nested layouts.
#[must_use]
pub fn is_typed_route(file_name: &str) -> bool {
    let Some(ext) = route_extension(file_name) else {
        return false;
    };
    let stem = &file_name[..file_name.len() - ext.len() - 1];

    if stem.is_empty() || stem.ends_with(".d") {
        return false;
    }

    !stem.contains('+') && stem != LAYOUT_STEM
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_extension() {
        assert_eq!(route_extension("index.tsx"), Some("tsx"));
        assert_eq!(route_extension("index.ts"), Some("ts"));
        assert_eq!(route_extension("index.jsx"), Some("jsx"));
        assert_eq!(route_extension("index.js"), Some("js"));
        assert_eq!(route_extension("index.mjs"), None);
        assert_eq!(route_extension("index"), None);
        assert_eq!(route_extension("index.TSX"), None);
    }

    #[test]
    fn test_plain_routes() {
        assert!(is_typed_route("index.tsx"));
        assert!(is_typed_route("about.ts"));
        assert!(is_typed_route("route.jsx"));
        assert!(is_typed_route("settings.js"));
    }

    #[test]
    fn test_dynamic_routes() {
        assert!(is_typed_route("[id].tsx"));
        assert!(is_typed_route("[...rest].tsx"));
    }

    #[test]
    fn test_layouts_are_not_routes() {
        assert!(!is_typed_route("_layout.tsx"));
        assert!(!is_typed_route("_layout.js"));
    }

    #[test]
    fn test_plus_files_are_not_routes() {
        assert!(!is_typed_route("+api.ts"));
        assert!(!is_typed_route("+html.tsx"));
        assert!(!is_typed_route("+not-found.tsx"));
        assert!(!is_typed_route("users+api.ts"));
    }

    #[test]
    fn test_non_source_files_are_not_routes() {
        assert!(!is_typed_route("logo.png"));
        assert!(!is_typed_route("styles.css"));
        assert!(!is_typed_route("README.md"));
        assert!(!is_typed_route("tsx"));
        assert!(!is_typed_route(".tsx"));
    }

    #[test]
    fn test_declaration_files_are_not_routes() {
        assert!(!is_typed_route("router.d.ts"));
        assert!(!is_typed_route("env.d.tsx"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert!(!is_typed_route("Index.TSX"));
        assert!(!is_typed_route("about.Ts"));
        assert!(is_typed_route("About.tsx"));
    }
}
