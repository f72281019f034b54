//! K-way merge over sorted, fallible sources.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::Result;

/// The current head item of one source, ordered by `(item, source)`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Head<T> {
    item: T,
    source: usize,
}

/// Merges several sorted sources into one sorted stream.
///
/// Each source must yield items in non-decreasing order. Equal items from
/// different sources are all emitted; the one from the lower source index
/// comes first. The first error reported by any source is returned and ends
/// the merge.
///
/// # Examples
///
/// ```
/// use bidx::sort::KWayMerge;
///
/// let a = vec![Ok(1), Ok(4)].into_iter();
/// let b = vec![Ok(2), Ok(3), Ok(4)].into_iter();
/// let merged: Vec<u32> = KWayMerge::new(vec![a, b])
///     .unwrap()
///     .collect::<bidx::error::Result<_>>()
///     .unwrap();
/// assert_eq!(merged, vec![1, 2, 3, 4, 4]);
/// ```
pub struct KWayMerge<T, I>
where
    T: Ord,
    I: Iterator<Item = Result<T>>,
{
    sources: Vec<I>,
    heap: BinaryHeap<Reverse<Head<T>>>,
    failed: bool,
}

impl<T, I> KWayMerge<T, I>
where
    T: Ord,
    I: Iterator<Item = Result<T>>,
{
    /// Prime every source with its first item.
    pub fn new(sources: Vec<I>) -> Result<Self> {
        let mut merge = KWayMerge {
            heap: BinaryHeap::with_capacity(sources.len()),
            sources,
            failed: false,
        };
        for source in 0..merge.sources.len() {
            merge.advance(source)?;
        }
        Ok(merge)
    }

    /// Number of sources that still have items.
    pub fn active_sources(&self) -> usize {
        self.heap.len()
    }

    fn advance(&mut self, source: usize) -> Result<()> {
        if let Some(next) = self.sources[source].next() {
            self.heap.push(Reverse(Head {
                item: next?,
                source,
            }));
        }
        Ok(())
    }
}

impl<T, I> Iterator for KWayMerge<T, I>
where
    T: Ord,
    I: Iterator<Item = Result<T>>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let Reverse(head) = self.heap.pop()?;
        if let Err(e) = self.advance(head.source) {
            self.failed = true;
            return Some(Err(e));
        }
        Some(Ok(head.item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BidxError;

    fn source(items: &[&str]) -> std::vec::IntoIter<Result<String>> {
        items
            .iter()
            .map(|s| Ok(s.to_string()))
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn test_merge_sorted_sources() {
        let merged: Vec<String> = KWayMerge::new(vec![
            source(&["a", "d", "f"]),
            source(&[]),
            source(&["b", "d", "e"]),
            source(&["c"]),
        ])
        .unwrap()
        .collect::<Result<_>>()
        .unwrap();

        assert_eq!(merged, vec!["a", "b", "c", "d", "d", "e", "f"]);
    }

    #[test]
    fn test_no_sources() {
        let mut merge = KWayMerge::new(Vec::<std::vec::IntoIter<Result<u32>>>::new()).unwrap();
        assert_eq!(merge.active_sources(), 0);
        assert!(merge.next().is_none());
    }

    #[test]
    fn test_pairs_tie_break_on_second_key() {
        let a = vec![Ok(("x".to_string(), 3u32)), Ok(("y".to_string(), 0))].into_iter();
        let b = vec![Ok(("x".to_string(), 1u32)), Ok(("x".to_string(), 3))].into_iter();

        let merged: Vec<(String, u32)> = KWayMerge::new(vec![a, b])
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(
            merged,
            vec![
                ("x".to_string(), 1),
                ("x".to_string(), 3),
                ("x".to_string(), 3),
                ("y".to_string(), 0)
            ]
        );
    }

    #[test]
    fn test_error_stops_merge() {
        let a = vec![Ok(1u32), Err(BidxError::storage("truncated run")), Ok(9)].into_iter();
        let b = vec![Ok(2u32)].into_iter();

        let mut merge = KWayMerge::new(vec![a, b]).unwrap();
        assert_eq!(merge.next().unwrap().unwrap(), 1);
        assert!(merge.next().unwrap().is_err());
        assert!(merge.next().is_none());
    }

    #[test]
    fn test_error_while_priming() {
        let a = vec![Err(BidxError::storage("unreadable run"))].into_iter();
        assert!(KWayMerge::<u32, _>::new(vec![a]).is_err());
    }
}
