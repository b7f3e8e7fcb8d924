//! Iterators over the key groups of a sorted slice.

use super::range::key_group_end;
use crate::key::KeyExtractor;
use smallvec::SmallVec;

/// Inline capacity of the per-group scratch buffers.
pub(crate) const GROUP_INLINE: usize = 8;

/// Iterator over `(key, multiplicity)` pairs, in key order.
///
/// Created by [`SortedView::key_counts`](super::SortedView::key_counts).
/// Supports reverse iteration.
///
/// # Examples
///
/// ```rust
/// use lazysorted::SortedList;
///
/// let mut list: SortedList<char> = "abbccc".chars().collect();
/// let counts: Vec<(char, usize)> = list.view().key_counts(..).collect();
/// assert_eq!(counts, vec![('a', 1), ('b', 2), ('c', 3)]);
/// ```
pub struct KeyCounts<'a, T, K> {
    remaining: &'a [T],
    key: &'a K,
}

impl<'a, T, K> KeyCounts<'a, T, K> {
    pub(crate) const fn new(remaining: &'a [T], key: &'a K) -> Self {
        Self { remaining, key }
    }
}

impl<T, K: KeyExtractor<T>> Iterator for KeyCounts<'_, T, K> {
    type Item = (K::Key, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let group_key = self.key.key(self.remaining.first()?);
        let end = key_group_end(self.remaining, self.key, 0);
        self.remaining = &self.remaining[end..];
        Some((group_key, end))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.remaining.len();
        (usize::from(len > 0), Some(len))
    }
}

impl<T, K: KeyExtractor<T>> DoubleEndedIterator for KeyCounts<'_, T, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let last = self.remaining.last()?;
        let group_key = self.key.key(last);
        let start = self
            .remaining
            .partition_point(|item| self.key.key(item) < group_key);
        let count = self.remaining.len() - start;
        self.remaining = &self.remaining[..start];
        Some((group_key, count))
    }
}

/// Iterator over the distinct keys, in key order.
pub struct Keys<'a, T, K> {
    counts: KeyCounts<'a, T, K>,
}

impl<'a, T, K> Keys<'a, T, K> {
    pub(crate) const fn new(counts: KeyCounts<'a, T, K>) -> Self {
        Self { counts }
    }
}

impl<T, K: KeyExtractor<T>> Iterator for Keys<'_, T, K> {
    type Item = K::Key;

    #[inline]
    fn next(&mut self) -> Option<K::Key> {
        self.counts.next().map(|(key, _)| key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.counts.size_hint()
    }
}

impl<T, K: KeyExtractor<T>> DoubleEndedIterator for Keys<'_, T, K> {
    #[inline]
    fn next_back(&mut self) -> Option<K::Key> {
        self.counts.next_back().map(|(key, _)| key)
    }
}

/// Iterator over the elements, yielding each distinct value once.
///
/// Values are compared with `==` inside each key group only.
pub struct DistinctItems<'a, T, K> {
    remaining: &'a [T],
    group: &'a [T],
    seen: SmallVec<[&'a T; GROUP_INLINE]>,
    key: &'a K,
}

impl<'a, T, K> DistinctItems<'a, T, K> {
    pub(crate) fn new(remaining: &'a [T], key: &'a K) -> Self {
        Self {
            remaining,
            group: &[],
            seen: SmallVec::new(),
            key,
        }
    }
}

impl<'a, T: PartialEq, K: KeyExtractor<T>> Iterator for DistinctItems<'a, T, K> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            let group = self.group;
            if let Some((item, rest)) = group.split_first() {
                self.group = rest;
                if !self.seen.contains(&item) {
                    self.seen.push(item);
                    return Some(item);
                }
                continue;
            }
            if self.remaining.is_empty() {
                return None;
            }
            let end = key_group_end(self.remaining, self.key, 0);
            let (group, rest) = self.remaining.split_at(end);
            self.group = group;
            self.remaining = rest;
            self.seen.clear();
        }
    }
}
