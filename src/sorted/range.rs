//! Binary-search range finding over a fully sorted container.
//!
//! [`SortedView`] is the borrowed, read-only face of a
//! [`SortedList`](super::SortedList). It can only be obtained through
//! [`SortedList::view`](super::SortedList::view), which merges any pending
//! elements first, so every search here runs over a slice that is
//! non-decreasing by key.
//!
//! # Complexity
//!
//! | Operation                          | Cost              |
//! |------------------------------------|-------------------|
//! | `bisect_left` / `bisect_right`     | O(log n)          |
//! | `find_key_range`                   | O(log n)          |
//! | `contains` / `count` / `index_of`  | O(log n + group)  |
//! | `last_lt` / `first_gt` / ...       | O(log n)          |
//! | `find_slice_range`                 | O(log n)          |

use super::iter::{DistinctItems, KeyCounts, Keys};
use crate::key::KeyExtractor;
use std::ops::{Bound, Index, Range, RangeBounds};

/// A fully sorted, read-only view of a container.
///
/// # Examples
///
/// ```rust
/// use lazysorted::SortedList;
///
/// let mut list: SortedList<i32> = [1, 2, 2, 2, 3].into_iter().collect();
/// let view = list.view();
/// assert_eq!(view.find_key_range(&2), 1..4);
/// assert_eq!(view.find_key_range(&0), 0..0);
/// assert_eq!(view[4], 3);
/// ```
pub struct SortedView<'a, T, K> {
    elements: &'a [T],
    key: &'a K,
}

impl<T, K> Clone for SortedView<'_, T, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, K> Copy for SortedView<'_, T, K> {}

impl<'a, T, K: KeyExtractor<T>> SortedView<'a, T, K> {
    /// `elements` must be non-decreasing by `key`.
    pub(crate) const fn new(elements: &'a [T], key: &'a K) -> Self {
        Self { elements, key }
    }

    /// The sorted elements.
    #[inline]
    #[must_use]
    pub const fn as_slice(&self) -> &'a [T] {
        self.elements
    }

    /// Number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if there are no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Element at `index`, if any.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'a T> {
        self.elements.get(index)
    }

    /// Element with the smallest key.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&'a T> {
        self.elements.first()
    }

    /// Element with the largest key.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&'a T> {
        self.elements.last()
    }

    /// Iterates in key order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'a, T> {
        self.elements.iter()
    }

    /// Key of `item` under this view's extractor.
    #[inline]
    pub fn key_of(&self, item: &T) -> K::Key {
        self.key.key(item)
    }

    /// Index of the first element whose key is not less than `key`.
    #[must_use]
    pub fn bisect_left(&self, key: &K::Key) -> usize {
        self.elements
            .partition_point(|item| self.key.key(item) < *key)
    }

    /// Index of the first element whose key is greater than `key`.
    #[must_use]
    pub fn bisect_right(&self, key: &K::Key) -> usize {
        self.elements
            .partition_point(|item| self.key.key(item) <= *key)
    }

    /// Half-open index range of the elements whose key equals `key`.
    ///
    /// When no element has that key the range is empty and starts at the
    /// position where such an element would be inserted.
    #[must_use]
    pub fn find_key_range(&self, key: &K::Key) -> Range<usize> {
        let start = self.bisect_left(key);
        let stop = start
            + self.elements[start..].partition_point(|item| self.key.key(item) <= *key);
        start..stop
    }

    /// Key range of `item`'s key.
    #[must_use]
    pub fn find_item_key_range(&self, item: &T) -> Range<usize> {
        self.find_key_range(&self.key.key(item))
    }

    /// Index of the first element with key `key`, if any.
    #[must_use]
    pub fn find_key(&self, key: &K::Key) -> Option<usize> {
        let range = self.find_key_range(key);
        (!range.is_empty()).then_some(range.start)
    }

    /// Returns `true` if an element equal to `item` is present.
    #[must_use]
    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.index_of(item).is_some()
    }

    /// Number of elements equal to `item`.
    #[must_use]
    pub fn count(&self, item: &T) -> usize
    where
        T: PartialEq,
    {
        self.elements[self.find_item_key_range(item)]
            .iter()
            .filter(|candidate| *candidate == item)
            .count()
    }

    /// Index of the first element equal to `item`.
    #[must_use]
    pub fn index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.find_item_key_range(item)
            .find(|&index| self.elements[index] == *item)
    }

    /// Last element whose key is less than `key`.
    #[must_use]
    pub fn last_lt(&self, key: &K::Key) -> Option<&'a T> {
        self.bisect_left(key)
            .checked_sub(1)
            .map(|index| &self.elements[index])
    }

    /// Last element whose key is less than or equal to `key`.
    #[must_use]
    pub fn last_le(&self, key: &K::Key) -> Option<&'a T> {
        self.bisect_right(key)
            .checked_sub(1)
            .map(|index| &self.elements[index])
    }

    /// First element whose key is greater than or equal to `key`.
    #[must_use]
    pub fn first_ge(&self, key: &K::Key) -> Option<&'a T> {
        self.elements.get(self.bisect_left(key))
    }

    /// First element whose key is greater than `key`.
    #[must_use]
    pub fn first_gt(&self, key: &K::Key) -> Option<&'a T> {
        self.elements.get(self.bisect_right(key))
    }

    /// Index range of the elements whose keys fall within `bounds`.
    ///
    /// Iterate the range with `.rev()` to walk it from the largest key down.
    /// Inverted bounds yield an empty range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazysorted::SortedList;
    ///
    /// let mut list: SortedList<i32> = [1, 3, 3, 5, 7].into_iter().collect();
    /// let view = list.view();
    /// assert_eq!(view.find_slice_range(3..=5), 1..4);
    /// assert_eq!(view.find_slice_range(3..5), 1..3);
    /// assert_eq!(view.find_slice_range(..), 0..5);
    /// ```
    pub fn find_slice_range<B>(&self, bounds: B) -> Range<usize>
    where
        B: RangeBounds<K::Key>,
    {
        let start = match bounds.start_bound() {
            Bound::Included(key) => self.bisect_left(key),
            Bound::Excluded(key) => self.bisect_right(key),
            Bound::Unbounded => 0,
        };
        let stop = match bounds.end_bound() {
            Bound::Included(key) => self.bisect_right(key),
            Bound::Excluded(key) => self.bisect_left(key),
            Bound::Unbounded => self.elements.len(),
        };
        start..stop.max(start)
    }

    /// Iterates the elements whose keys fall within `bounds`.
    pub fn slice_iter<B>(&self, bounds: B) -> std::slice::Iter<'a, T>
    where
        B: RangeBounds<K::Key>,
    {
        self.elements[self.find_slice_range(bounds)].iter()
    }

    /// Iterates `(key, multiplicity)` pairs for the keys within `bounds`.
    pub fn key_counts<B>(&self, bounds: B) -> KeyCounts<'a, T, K>
    where
        B: RangeBounds<K::Key>,
    {
        KeyCounts::new(&self.elements[self.find_slice_range(bounds)], self.key)
    }

    /// Iterates the distinct keys within `bounds`.
    pub fn keys<B>(&self, bounds: B) -> Keys<'a, T, K>
    where
        B: RangeBounds<K::Key>,
    {
        Keys::new(self.key_counts(bounds))
    }

    /// Iterates the elements within `bounds`, skipping repeated values.
    pub fn items<B>(&self, bounds: B) -> DistinctItems<'a, T, K>
    where
        B: RangeBounds<K::Key>,
        T: PartialEq,
    {
        DistinctItems::new(&self.elements[self.find_slice_range(bounds)], self.key)
    }
}

impl<T, K> Index<usize> for SortedView<'_, T, K> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.elements[index]
    }
}

impl<'a, T, K> IntoIterator for SortedView<'a, T, K> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl<T: std::fmt::Debug, K> std::fmt::Debug for SortedView<'_, T, K> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.debug_list().entries(self.elements).finish()
    }
}

/// End of the key group starting at `start` in a sorted slice.
pub(crate) fn key_group_end<T, K: KeyExtractor<T>>(elements: &[T], key: &K, start: usize) -> usize {
    let group_key = key.key(&elements[start]);
    start + elements[start..].partition_point(|item| key.key(item) <= group_key)
}

/// Resolves a possibly negative index against `len`.
pub(crate) fn resolve_index(index: isize, len: usize) -> Option<usize> {
    if index < 0 {
        len.checked_sub(index.unsigned_abs())
    } else {
        usize::try_from(index).ok().filter(|position| *position < len)
    }
}
