//! Bulk loading of sorted entries.
//!
//! Inserting sorted keys front to back turns every `low`/`high` link into a
//! chain, so lookups walk O(N) siblings. Inserting the median first and then
//! recursing into each half keeps sibling chains O(log N) deep ("Better
//! Insertion Orders", Bentley & Sedgewick, Dr. Dobb's 1998). Depth along shared
//! prefixes is key length either way.

use std::ops::Range;

use crate::tst::TernarySearchTree;

/// Order in which [`load`] inserts entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InsertionOrder {
    /// Median of the range, then the left half, then the right half.
    /// Expects entries sorted by key.
    #[default]
    MedianFirst,
    /// Front to back, as given.
    Sequential,
}

/// Indices `0..len` in median-first order.
///
/// Yields the same sequence as the recursive
/// `insert(mid); recurse(left); recurse(right)` with `mid = len / 2`, using an
/// explicit stack bounded by O(log len) ranges.
#[derive(Clone, Debug)]
pub struct MedianFirst {
    stack: Vec<Range<usize>>,
    remaining: usize,
}

impl MedianFirst {
    pub fn new(len: usize) -> Self {
        let mut stack = Vec::new();
        if len > 0 {
            stack.push(0..len);
        }
        Self {
            stack,
            remaining: len,
        }
    }
}

impl Iterator for MedianFirst {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let range = self.stack.pop()?;
        let mid = range.start + (range.end - range.start) / 2;
        // Right pushed first so the left half is drained first.
        if mid + 1 < range.end {
            self.stack.push(mid + 1..range.end);
        }
        if range.start < mid {
            self.stack.push(range.start..mid);
        }
        self.remaining -= 1;
        Some(mid)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for MedianFirst {}

/// Insert every item of `items` into `tree` in `order`.
///
/// `key` and `value` project an item into its key bytes and stored value.
/// Duplicate keys resolve to whichever item is inserted last. For
/// [`InsertionOrder::MedianFirst`] that depends on the tree shape, so callers
/// wanting a specific winner should deduplicate first.
pub fn load<'a, T, V>(
    tree: &mut TernarySearchTree<V>,
    items: &'a [T],
    order: InsertionOrder,
    key: impl Fn(&'a T) -> &'a [u8],
    mut value: impl FnMut(&'a T) -> V,
) {
    match order {
        InsertionOrder::MedianFirst => {
            if let Some(i) = items.windows(2).position(|w| key(&w[0]) > key(&w[1])) {
                tracing::warn!(
                    position = i + 1,
                    entries = items.len(),
                    "median-first load given unsorted entries; tree will be unbalanced"
                );
            }
            for i in MedianFirst::new(items.len()) {
                let item = &items[i];
                tree.insert(key(item), value(item));
            }
        }
        InsertionOrder::Sequential => {
            for item in items {
                tree.insert(key(item), value(item));
            }
        }
    }
}
