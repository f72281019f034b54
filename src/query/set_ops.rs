//! Set algebra over sorted, duplicate-free document id lists.
//!
//! Every function takes strictly increasing inputs and returns a strictly
//! increasing output in a single forward pass over its inputs.

use std::cmp::Ordering;

use crate::index::DocId;

/// Ids present in both `a` and `b`.
pub fn intersect(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// Ids present in `a` or `b`, each once.
pub fn union(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
            Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

/// Ids present in `a` but not in `b`.
pub fn difference(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(a.len());
    let mut j = 0;
    for &id in a {
        while j < b.len() && b[j] < id {
            j += 1;
        }
        if j == b.len() || b[j] != id {
            out.push(id);
        }
    }
    out
}

/// Ids in `0..universe` not present in `a`.
///
/// Runs in `O(universe)` time regardless of the size of `a`.
pub fn complement(universe: u32, a: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity((universe as usize).saturating_sub(a.len()));
    let mut j = 0;
    for id in 0..universe {
        while j < a.len() && a[j] < id {
            j += 1;
        }
        if j == a.len() || a[j] != id {
            out.push(id);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect() {
        assert_eq!(intersect(&[1, 3, 5, 7], &[3, 4, 5, 8]), vec![3, 5]);
        assert_eq!(intersect(&[1, 2], &[3, 4]), Vec::<DocId>::new());
        assert_eq!(intersect(&[], &[1]), Vec::<DocId>::new());
    }

    #[test]
    fn test_union() {
        assert_eq!(union(&[1, 3, 5], &[2, 3, 6, 9]), vec![1, 2, 3, 5, 6, 9]);
        assert_eq!(union(&[], &[4]), vec![4]);
        assert_eq!(union(&[0, 1], &[0, 1]), vec![0, 1]);
    }

    #[test]
    fn test_difference() {
        assert_eq!(difference(&[1, 2, 3, 4], &[2, 4, 6]), vec![1, 3]);
        assert_eq!(difference(&[1, 2], &[]), vec![1, 2]);
        assert_eq!(difference(&[], &[1]), Vec::<DocId>::new());
    }

    #[test]
    fn test_complement() {
        assert_eq!(complement(5, &[1, 3]), vec![0, 2, 4]);
        assert_eq!(complement(3, &[]), vec![0, 1, 2]);
        assert_eq!(complement(3, &[0, 1, 2]), Vec::<DocId>::new());
        assert_eq!(complement(0, &[]), Vec::<DocId>::new());
        // Ids beyond the universe are ignored.
        assert_eq!(complement(2, &[1, 7]), vec![0]);
    }
}
