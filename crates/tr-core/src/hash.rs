//! Fast hash map and hash set type aliases.
//!
//! The route index and the generator's conflict table are keyed by short
//! path strings, which is where the Fx hash from `rustc-hash` does well.
//! None of these tables are exposed to untrusted input, so the lack of
//! denial-of-service resistance is acceptable.
//!
//! # Examples
//!
//! ```
//! use tr_core::{FxHashMap, FxHashSet};
//!
//! let mut hrefs: FxHashMap<&str, &str> = FxHashMap::default();
//! hrefs.insert("/about", "./about.tsx");
//!
//! let routes: FxHashSet<&str> = ["./index.tsx"].into_iter().collect();
//! assert!(routes.contains("./index.tsx"));
//! ```

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// A [`HashSet`](std::collections::HashSet) using the Fx hash algorithm.
pub type FxHashSet<V> = rustc_hash::FxHashSet<V>;

/// Creates a new [`FxHashSet`] with the specified capacity.
///
/// Used when seeding a route index from a freshly scanned context, where the
/// upper bound on the number of entries is known.
#[inline]
#[must_use]
pub fn fx_hash_set_with_capacity<V>(capacity: usize) -> FxHashSet<V> {
    FxHashSet::with_capacity_and_hasher(capacity, rustc_hash::FxBuildHasher)
}
