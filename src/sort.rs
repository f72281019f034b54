//! Sorting utilities for external merge sort.
//!
//! In-memory chunks are sorted with [`sort_dedup`] (or [`sort_stable`] when
//! duplicates must survive) before they are spilled; [`KWayMerge`] then
//! merges the sorted spills back into a single ordered stream.

pub mod merge;

pub use merge::KWayMerge;

/// Stable-sort `items` and drop consecutive duplicates.
///
/// Afterwards `items` is strictly increasing.
pub fn sort_dedup<T: Ord>(items: &mut Vec<T>) {
    items.sort();
    items.dedup();
}

/// Stable-sort `items`, keeping duplicates.
pub fn sort_stable<T: Ord>(items: &mut [T]) {
    items.sort();
}

/// Check whether `items` is strictly increasing.
pub fn is_strictly_increasing<T: Ord>(items: &[T]) -> bool {
    items.windows(2).all(|pair| pair[0] < pair[1])
}
