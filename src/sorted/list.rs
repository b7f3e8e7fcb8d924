//! The lazily sorted multiset container.
//!
//! This module provides [`SortedList`], an ordered container that accepts
//! duplicate keys and defers sorting work.
//!
//! # Overview
//!
//! The backing `Vec` holds every element. While elements are pending, it is
//! only guaranteed to be sorted once the container has been resorted:
//!
//! ```text
//!   elements:  [ sorted run | interior adds and new maxima, in arrival order ]
//! ```
//!
//! - An element whose key is at or beyond one of the cached extreme keys is
//!   placed directly at the front or the back, in O(1) amortized time for
//!   the back and O(n) for the front. The cached extremes stay exact.
//! - Any other element is appended and counted as pending. Once the pending
//!   count satisfies the [`ThresholdPolicy`] against the rest, the whole
//!   container is stably resorted.
//! - Every read (indexing, iteration, membership, searching, slicing)
//!   resorts first, so callers never observe the pending tail.
//!
//! Reads that may resort take `&mut self`. To run many reads after a single
//! resort, use [`SortedList::view`], which returns a [`SortedView`] whose
//! methods take `&self`.
//!
//! # Time Complexity
//!
//! | Operation                | Cost                                     |
//! |--------------------------|------------------------------------------|
//! | `add` (new maximum)      | O(1) amortized                           |
//! | `add` (new minimum)      | O(n)                                     |
//! | `add` (interior)         | O(1) plus an amortized share of a resort |
//! | `insert` (interior)      | O(n log n) if pending, else O(n)         |
//! | `restore_sorted_order`   | O(n log n), O(1) when nothing is pending |
//! | `find_key_range`         | O(log n) after the resort                |
//! | `remove` / `remove_all`  | O(n)                                     |
//! | `len` / `pending_len`    | O(1)                                     |
//!
//! # Thread Safety
//!
//! The container shares its key extractor and error sink between copies
//! through `Rc`, so it is neither `Send` nor `Sync`. It holds no lock and
//! gives no happens-before guarantees; confine each container to one thread.
//!
//! # Examples
//!
//! ```rust
//! use lazysorted::SortedList;
//!
//! let mut list = SortedList::new();
//! for value in [5, 3, 8, 1, 9, 4] {
//!     list.add(value);
//! }
//! // 4 is interior, so it waits in the pending tail
//! assert_eq!(list.pending_len(), 1);
//!
//! // any read merges it first
//! assert_eq!(list.to_vec(), vec![1, 3, 4, 5, 8, 9]);
//! assert_eq!(list.pending_len(), 0);
//! ```

use super::range::{SortedView, resolve_index};
use crate::error::{ErrorSink, Result, SortedListError, TracingSink};
use crate::key::{Identity, KeyExtractor, SameIdentity};
use crate::threshold::ThresholdPolicy;
use std::fmt;
use std::ops::{Bound, Range, RangeBounds};
use std::rc::Rc;

/// Where `add` puts a new element.
enum Placement {
    Front,
    Back,
    Pending,
}

/// A lazily sorted container allowing duplicate keys.
///
/// # Type Parameters
///
/// * `T` - The element type.
/// * `K` - The [`KeyExtractor`] deriving the sort key; [`Identity`] by default.
///
/// # Examples
///
/// ```rust
/// use lazysorted::SortedList;
///
/// let mut people = SortedList::with_key(|person: &(&str, u32)| person.1);
/// people.add(("carol", 41));
/// people.add(("alice", 29));
/// people.add(("bob", 35));
///
/// assert_eq!(people.first(), Some(&("alice", 29)));
/// assert_eq!(people.view().first_gt(&35), Some(&("carol", 41)));
/// ```
pub struct SortedList<T, K = Identity>
where
    K: KeyExtractor<T>,
{
    elements: Vec<T>,
    pending: usize,
    first_key: Option<K::Key>,
    last_key: Option<K::Key>,
    threshold: ThresholdPolicy,
    key: Rc<K>,
    sink: Rc<dyn ErrorSink>,
}

impl<T: Ord + Clone> SortedList<T, Identity> {
    /// Creates an empty container ordered by the elements themselves.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazysorted::SortedList;
    ///
    /// let list: SortedList<i32> = SortedList::new();
    /// assert!(list.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_key(Identity)
    }
}

impl<T, K: KeyExtractor<T>> SortedList<T, K> {
    /// Creates an empty container ordered by `key`.
    #[must_use]
    pub fn with_key(key: K) -> Self {
        Self::from_parts(Vec::new(), Rc::new(key), Rc::new(TracingSink))
    }

    /// Creates a fully sorted container from `items`, ordered by `key`.
    ///
    /// The sort is stable: elements with equal keys keep their input order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazysorted::SortedList;
    ///
    /// let mut list = SortedList::from_iter_with_key(["bb", "a", "cc"], |word: &&str| word.len());
    /// assert_eq!(list.to_vec(), vec!["a", "bb", "cc"]);
    /// ```
    pub fn from_iter_with_key<I>(items: I, key: K) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut elements: Vec<T> = items.into_iter().collect();
        elements.sort_by_cached_key(|item| key.key(item));
        Self::from_parts(elements, Rc::new(key), Rc::new(TracingSink))
    }

    /// `elements` must already be sorted by `key`.
    fn from_parts(elements: Vec<T>, key: Rc<K>, sink: Rc<dyn ErrorSink>) -> Self {
        let mut list = Self {
            elements,
            pending: 0,
            first_key: None,
            last_key: None,
            threshold: ThresholdPolicy::default(),
            key,
            sink,
        };
        list.refresh_extremes();
        list
    }

    /// A container sharing this one's configuration, holding `elements`,
    /// which must already be sorted.
    pub(crate) fn derive_sorted(&self, elements: Vec<T>) -> Self {
        let mut derived = Self::from_parts(elements, Rc::clone(&self.key), Rc::clone(&self.sink));
        derived.threshold = self.threshold;
        derived
    }

    /// The backing slice; sorted only when nothing is pending.
    pub(crate) fn raw_slice(&self) -> &[T] {
        &self.elements
    }

    /// Swaps in a new, already sorted, backing vector.
    pub(crate) fn replace_sorted(&mut self, elements: Vec<T>) {
        self.elements = elements;
        self.pending = 0;
        self.refresh_extremes();
    }

    /// Sets the resort threshold (builder style).
    #[must_use]
    pub fn with_threshold(mut self, threshold: ThresholdPolicy) -> Self {
        self.threshold = threshold;
        self
    }

    /// Routes every error this container signals through `sink` (builder
    /// style). Copies made afterwards share the sink.
    #[must_use]
    pub fn with_error_sink<S: ErrorSink + 'static>(mut self, sink: S) -> Self {
        self.set_error_sink(sink);
        self
    }

    /// Replaces the error sink.
    pub fn set_error_sink<S: ErrorSink + 'static>(&mut self, sink: S) {
        self.sink = Rc::new(sink);
    }

    /// The current resort threshold.
    #[inline]
    #[must_use]
    pub const fn threshold(&self) -> ThresholdPolicy {
        self.threshold
    }

    /// Replaces the resort threshold.
    ///
    /// The new policy is consulted at the next interior `add`; it does not
    /// trigger a resort by itself.
    pub fn set_threshold(&mut self, threshold: ThresholdPolicy) {
        self.threshold = threshold;
    }

    /// Replaces one or both parts of the threshold, keeping the other.
    ///
    /// # Errors
    ///
    /// Returns [`SortedListError::InvalidThreshold`] if `fraction` is outside
    /// `[0, 1]`; the threshold is left unchanged.
    pub fn set_threshold_parts(
        &mut self,
        fraction: Option<f64>,
        absolute: Option<usize>,
    ) -> Result<()> {
        let current = self.threshold;
        let updated = current
            .with_fraction(fraction.unwrap_or(current.fraction()))
            .map(|policy| policy.with_absolute(absolute.unwrap_or(current.absolute())));
        match updated {
            Ok(policy) => {
                self.threshold = policy;
                Ok(())
            }
            Err(error) => Err(self.report(error)),
        }
    }

    /// The key extractor, shared with every copy of this container.
    #[inline]
    #[must_use]
    pub fn key_extractor(&self) -> &K {
        &self.key
    }

    /// Key of `item` under this container's extractor.
    #[inline]
    pub fn key_of(&self, item: &T) -> K::Key {
        self.key.key(item)
    }

    /// Number of elements, pending ones included.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the container holds no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of elements waiting in the unsorted tail.
    #[inline]
    #[must_use]
    pub const fn pending_len(&self) -> usize {
        self.pending
    }

    /// Number of elements that are not pending.
    #[inline]
    #[must_use]
    pub fn sorted_len(&self) -> usize {
        self.elements.len() - self.pending
    }

    /// Smallest key in the container. Does not resort.
    #[inline]
    #[must_use]
    pub const fn first_key(&self) -> Option<&K::Key> {
        self.first_key.as_ref()
    }

    /// Largest key in the container. Does not resort.
    #[inline]
    #[must_use]
    pub const fn last_key(&self) -> Option<&K::Key> {
        self.last_key.as_ref()
    }

    /// Passes `error` to the sink and hands it back for returning.
    pub(crate) fn report(&self, error: SortedListError) -> SortedListError {
        self.notify(&error);
        error
    }

    /// Passes `error` to the sink.
    pub(crate) fn notify(&self, error: &SortedListError) {
        self.sink.report(error);
    }

    /// Returns `true` when `other` is known to order its elements exactly
    /// like `self`: both hold the same extractor, or the extractor type
    /// carries no state.
    pub(crate) fn shares_key_with(&self, other: &Self) -> bool {
        std::mem::size_of::<K>() == 0 || Rc::ptr_eq(&self.key, &other.key)
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Adds an element, deferring the sort when its key is interior.
    ///
    /// - empty container or key `>=` the largest key: appended.
    /// - key `<=` the smallest key: prepended.
    /// - otherwise: appended to the pending tail, and the container is
    ///   resorted if the threshold is now met.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazysorted::{SortedList, ThresholdPolicy};
    ///
    /// let mut list = SortedList::new().with_threshold(ThresholdPolicy::new(2.0 / 3.0, 2).unwrap());
    /// list.add(1);
    /// list.add(10);
    /// list.add(5);
    /// assert_eq!(list.pending_len(), 1);
    /// list.add(6);
    /// assert_eq!(list.pending_len(), 0);
    /// ```
    pub fn add(&mut self, item: T) {
        let key = self.key.key(&item);
        let placement = match (&self.first_key, &self.last_key) {
            (Some(first), Some(last)) => {
                if key >= *last {
                    Placement::Back
                } else if key <= *first {
                    Placement::Front
                } else {
                    Placement::Pending
                }
            }
            _ => Placement::Back,
        };

        match placement {
            Placement::Back => {
                if self.first_key.is_none() {
                    self.first_key = Some(self.key.key(&item));
                }
                self.elements.push(item);
                self.last_key = Some(key);
            }
            Placement::Front => {
                self.elements.insert(0, item);
                self.first_key = Some(key);
            }
            Placement::Pending => {
                self.elements.push(item);
                self.pending += 1;
                if self.threshold.is_met(self.sorted_len(), self.pending) {
                    self.restore_sorted_order();
                }
            }
        }
    }

    /// Adds an element at its sorted position right away.
    ///
    /// Boundary keys behave exactly like [`SortedList::add`]. An interior
    /// element is placed after every element with an equal key, after any
    /// pending elements have been merged, so the container is fully sorted
    /// afterwards.
    pub fn insert(&mut self, item: T) {
        let key = self.key.key(&item);
        let interior = matches!(
            (&self.first_key, &self.last_key),
            (Some(first), Some(last)) if key > *first && key < *last
        );
        if interior {
            let position = self.view().bisect_right(&key);
            self.elements.insert(position, item);
        } else {
            self.add(item);
        }
    }

    /// Adds every element of `items`.
    pub fn merge<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.add(item);
        }
    }

    // =========================================================================
    // Resorting
    // =========================================================================

    /// Stably resorts the container, absorbing every pending element.
    ///
    /// Returns the number of elements that were pending; zero means nothing
    /// had to be done. Calling it again right away is a no-op.
    pub fn restore_sorted_order(&mut self) -> usize {
        let merged = self.pending;
        if merged > 0 {
            let key = &self.key;
            // stable: equal keys keep their insertion order
            self.elements.sort_by_cached_key(|item| key.key(item));
            self.pending = 0;
            self.refresh_extremes();
            tracing::trace!(merged, len = self.elements.len(), "restored sorted order");
        }
        merged
    }

    /// Alias of [`SortedList::restore_sorted_order`].
    pub fn sort(&mut self) -> usize {
        self.restore_sorted_order()
    }

    /// Recomputes the cached extremes. Requires `pending == 0`.
    fn refresh_extremes(&mut self) {
        debug_assert_eq!(self.pending, 0);
        self.first_key = self.elements.first().map(|item| self.key.key(item));
        self.last_key = self.elements.last().map(|item| self.key.key(item));
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Resorts if needed and returns a read-only view of the sorted elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazysorted::SortedList;
    ///
    /// let mut list: SortedList<i32> = [4, 1, 3].into_iter().collect();
    /// let view = list.view();
    /// assert_eq!(view.bisect_left(&3), 1);
    /// assert_eq!(view.last_le(&2), Some(&1));
    /// ```
    pub fn view(&mut self) -> SortedView<'_, T, K> {
        self.restore_sorted_order();
        SortedView::new(&self.elements, &self.key)
    }

    /// The sorted elements as a slice.
    pub fn as_slice(&mut self) -> &[T] {
        self.view().as_slice()
    }

    /// Iterates in key order.
    pub fn iter(&mut self) -> std::slice::Iter<'_, T> {
        self.view().iter()
    }

    /// Clones the sorted elements into a `Vec`.
    pub fn to_vec(&mut self) -> Vec<T>
    where
        T: Clone,
    {
        self.as_slice().to_vec()
    }

    /// Consumes the container, returning its elements in key order.
    #[must_use]
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        self.restore_sorted_order();
        self.elements
    }

    /// Element at `index` in key order.
    pub fn get(&mut self, index: usize) -> Option<&T> {
        self.view().get(index)
    }

    /// Element at `index`, counting from the end when negative.
    ///
    /// # Errors
    ///
    /// Returns [`SortedListError::IndexOutOfRange`] outside `[-len, len)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazysorted::SortedList;
    ///
    /// let mut list: SortedList<i32> = [3, 1, 2].into_iter().collect();
    /// assert_eq!(list.at(-1), Ok(&3));
    /// assert!(list.at(3).is_err());
    /// ```
    pub fn at(&mut self, index: isize) -> Result<&T> {
        self.restore_sorted_order();
        let len = self.elements.len();
        match resolve_index(index, len) {
            Some(position) => Ok(&self.elements[position]),
            None => Err(self.report(SortedListError::IndexOutOfRange { index, len })),
        }
    }

    /// Element with the smallest key.
    pub fn first(&mut self) -> Option<&T> {
        self.view().first()
    }

    /// Element with the largest key.
    pub fn last(&mut self) -> Option<&T> {
        self.view().last()
    }

    /// Returns `true` if an element equal to `item` is present.
    pub fn contains(&mut self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.view().contains(item)
    }

    /// Number of elements equal to `item`.
    pub fn count(&mut self, item: &T) -> usize
    where
        T: PartialEq,
    {
        self.view().count(item)
    }

    /// Index of the first element equal to `item`.
    pub fn index_of(&mut self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.view().index_of(item)
    }

    /// Half-open index range of the elements whose key equals `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazysorted::SortedList;
    ///
    /// let mut list: SortedList<i32> = [1, 2, 2, 2, 3].into_iter().collect();
    /// assert_eq!(list.find_key_range(&2), 1..4);
    /// assert_eq!(list.find_key_range(&5), 5..5);
    /// ```
    pub fn find_key_range(&mut self, key: &K::Key) -> Range<usize> {
        self.view().find_key_range(key)
    }

    /// Key range of `item`'s key.
    pub fn find_item_key_range(&mut self, item: &T) -> Range<usize> {
        self.view().find_item_key_range(item)
    }

    /// Index of the first element with key `key`, if any.
    pub fn find_key(&mut self, key: &K::Key) -> Option<usize> {
        self.view().find_key(key)
    }

    /// Index of the first element whose key is not less than `key`.
    pub fn bisect_left(&mut self, key: &K::Key) -> usize {
        self.view().bisect_left(key)
    }

    /// Index of the first element whose key is greater than `key`.
    pub fn bisect_right(&mut self, key: &K::Key) -> usize {
        self.view().bisect_right(key)
    }

    /// Last element whose key is less than `key`.
    pub fn last_lt(&mut self, key: &K::Key) -> Option<&T> {
        self.view().last_lt(key)
    }

    /// Last element whose key is less than or equal to `key`.
    pub fn last_le(&mut self, key: &K::Key) -> Option<&T> {
        self.view().last_le(key)
    }

    /// First element whose key is greater than or equal to `key`.
    pub fn first_ge(&mut self, key: &K::Key) -> Option<&T> {
        self.view().first_ge(key)
    }

    /// First element whose key is greater than `key`.
    pub fn first_gt(&mut self, key: &K::Key) -> Option<&T> {
        self.view().first_gt(key)
    }

    /// Index range of the elements whose keys fall within `bounds`.
    pub fn find_slice_range<B>(&mut self, bounds: B) -> Range<usize>
    where
        B: RangeBounds<K::Key>,
    {
        self.view().find_slice_range(bounds)
    }

    /// A new container holding copies of the elements whose keys fall
    /// within `bounds`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazysorted::SortedList;
    ///
    /// let mut list: SortedList<i32> = (1..=10).collect();
    /// let mut middle = list.slice(4..7);
    /// assert_eq!(middle.to_vec(), vec![4, 5, 6]);
    /// ```
    pub fn slice<B>(&mut self, bounds: B) -> Self
    where
        B: RangeBounds<K::Key>,
        T: Clone,
    {
        let range = self.find_slice_range(bounds);
        self.derive_sorted(self.elements[range].to_vec())
    }

    /// A new container holding copies of the elements at the positions in
    /// `positions`.
    ///
    /// # Errors
    ///
    /// Returns [`SortedListError::IndexOutOfRange`] if the range reaches past
    /// the end or is inverted.
    pub fn slice_positions<B>(&mut self, positions: B) -> Result<Self>
    where
        B: RangeBounds<usize>,
        T: Clone,
    {
        self.restore_sorted_order();
        let len = self.elements.len();
        let start = match positions.start_bound() {
            Bound::Included(&start) => Some(start),
            Bound::Excluded(&start) => start.checked_add(1),
            Bound::Unbounded => Some(0),
        };
        let end = match positions.end_bound() {
            Bound::Included(&end) => end.checked_add(1),
            Bound::Excluded(&end) => Some(end),
            Bound::Unbounded => Some(len),
        };
        let failed = match (start, end) {
            (Some(start), Some(end)) if start <= end && end <= len => {
                return Ok(self.derive_sorted(self.elements[start..end].to_vec()));
            }
            (_, Some(end)) if end > len => Some(end),
            (_, None) => None,
            // end is in range, so the start is past it or overflowed
            (start, Some(_)) => start,
        };
        let index = failed.map_or(isize::MAX, |bound| isize::try_from(bound).unwrap_or(isize::MAX));
        Err(self.report(SortedListError::IndexOutOfRange { index, len }))
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Removes the sorted element at `position`. Requires `pending == 0`.
    pub(crate) fn take_at(&mut self, position: usize) -> T {
        debug_assert_eq!(self.pending, 0);
        let removed = self.elements.remove(position);
        self.refresh_extremes();
        removed
    }

    fn take_first_match<F>(&mut self, item: &T, matches: F) -> Option<T>
    where
        F: Fn(&T, &T) -> bool,
    {
        let position = {
            let view = self.view();
            view.find_item_key_range(item)
                .find(|&index| matches(&view[index], item))?
        };
        Some(self.take_at(position))
    }

    fn remove_all_matching<F>(&mut self, item: &T, matches: F) -> usize
    where
        F: Fn(&T, &T) -> bool,
    {
        let range = self.find_item_key_range(item);
        // stable compaction of the key range: survivors move to the front
        let mut write = range.start;
        for read in range.clone() {
            if !matches(&self.elements[read], item) {
                self.elements.swap(write, read);
                write += 1;
            }
        }
        let removed = range.end - write;
        if removed > 0 {
            self.elements.drain(write..range.end);
            self.refresh_extremes();
        }
        removed
    }

    /// Removes and returns the first element equal to `item`.
    ///
    /// # Errors
    ///
    /// Returns [`SortedListError::NotFound`] if no element is equal to
    /// `item`. Use [`SortedList::discard`] to ignore absence.
    pub fn remove(&mut self, item: &T) -> Result<T>
    where
        T: PartialEq,
    {
        match self.take_first_match(item, T::eq) {
            Some(removed) => Ok(removed),
            None => Err(self.report(SortedListError::NotFound { operation: "remove" })),
        }
    }

    /// Removes and returns the first element equal to `item`, if any.
    pub fn discard(&mut self, item: &T) -> Option<T>
    where
        T: PartialEq,
    {
        self.take_first_match(item, T::eq)
    }

    /// Removes and returns the first element that is the same object as
    /// `item`.
    ///
    /// # Errors
    ///
    /// Returns [`SortedListError::NotFound`] if no stored element is
    /// identical to `item`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazysorted::SortedList;
    /// use std::rc::Rc;
    ///
    /// let shared = Rc::new(7);
    /// let mut list = SortedList::new();
    /// list.add(Rc::new(7));
    /// list.add(Rc::clone(&shared));
    ///
    /// let removed = list.remove_identical(&shared).unwrap();
    /// assert!(Rc::ptr_eq(&removed, &shared));
    /// assert_eq!(list.len(), 1);
    /// ```
    pub fn remove_identical(&mut self, item: &T) -> Result<T>
    where
        T: SameIdentity,
    {
        match self.take_first_match(item, T::same_identity) {
            Some(removed) => Ok(removed),
            None => Err(self.report(SortedListError::NotFound {
                operation: "remove_identical",
            })),
        }
    }

    /// Removes and returns the first element identical to `item`, if any.
    pub fn discard_identical(&mut self, item: &T) -> Option<T>
    where
        T: SameIdentity,
    {
        self.take_first_match(item, T::same_identity)
    }

    /// Removes every element equal to `item`; returns how many were removed.
    pub fn remove_all(&mut self, item: &T) -> usize
    where
        T: PartialEq,
    {
        self.remove_all_matching(item, T::eq)
    }

    /// Removes every element identical to `item`; returns how many were
    /// removed.
    pub fn remove_all_identical(&mut self, item: &T) -> usize
    where
        T: SameIdentity,
    {
        self.remove_all_matching(item, T::same_identity)
    }

    /// Removes every element with key `key`, whatever its value.
    pub fn remove_key(&mut self, key: &K::Key) -> usize {
        let range = self.find_key_range(key);
        let removed = range.len();
        if removed > 0 {
            self.elements.drain(range);
            self.refresh_extremes();
        }
        removed
    }

    /// Replaces every copy of `old` with a copy of `new`; returns the count.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazysorted::SortedList;
    ///
    /// let mut list: SortedList<i32> = [1, 2, 2, 3].into_iter().collect();
    /// assert_eq!(list.replace(&2, 9), 2);
    /// assert_eq!(list.to_vec(), vec![1, 3, 9, 9]);
    /// ```
    pub fn replace(&mut self, old: &T, new: T) -> usize
    where
        T: PartialEq + Clone,
    {
        let count = self.remove_all(old);
        self.merge(std::iter::repeat_n(new, count));
        count
    }

    /// Replaces every element identical to `old` with a copy of `new`.
    pub fn replace_identical(&mut self, old: &T, new: T) -> usize
    where
        T: SameIdentity + Clone,
    {
        let count = self.remove_all_identical(old);
        self.merge(std::iter::repeat_n(new, count));
        count
    }

    fn try_pop_at(&mut self, index: isize) -> Result<T> {
        self.restore_sorted_order();
        let len = self.elements.len();
        if len == 0 {
            return Err(SortedListError::NotFound { operation: "pop" });
        }
        resolve_index(index, len)
            .map(|position| self.take_at(position))
            .ok_or(SortedListError::IndexOutOfRange { index, len })
    }

    /// Removes and returns the element with the largest key.
    ///
    /// # Errors
    ///
    /// Returns [`SortedListError::NotFound`] when the container is empty.
    pub fn pop(&mut self) -> Result<T> {
        self.pop_at(-1)
    }

    /// Removes and returns the element at `index`, counting from the end
    /// when negative.
    ///
    /// # Errors
    ///
    /// Returns [`SortedListError::NotFound`] when the container is empty and
    /// [`SortedListError::IndexOutOfRange`] outside `[-len, len)`.
    pub fn pop_at(&mut self, index: isize) -> Result<T> {
        self.try_pop_at(index).map_err(|error| self.report(error))
    }

    /// Like [`SortedList::pop_at`], but returns `fallback()` instead of
    /// failing.
    pub fn pop_or_else<F>(&mut self, index: isize, fallback: F) -> T
    where
        F: FnOnce() -> T,
    {
        self.try_pop_at(index).unwrap_or_else(|_| fallback())
    }

    /// Overwrites the element at `index`, returning the old one.
    ///
    /// Positional order is derived from the keys, so the write is only
    /// accepted when `value` has exactly the key of the element it replaces.
    ///
    /// # Errors
    ///
    /// Returns [`SortedListError::IndexOutOfRange`] past the end and
    /// [`SortedListError::ReadOnlyViolation`] when the key would change.
    pub fn replace_at(&mut self, index: usize, value: T) -> Result<T> {
        self.restore_sorted_order();
        let len = self.elements.len();
        let Some(slot) = self.elements.get(index) else {
            let index = isize::try_from(index).unwrap_or(isize::MAX);
            return Err(self.report(SortedListError::IndexOutOfRange { index, len }));
        };
        if self.key.key(slot) != self.key.key(&value) {
            return Err(self.report(SortedListError::ReadOnlyViolation {
                operation: "replace_at",
            }));
        }
        Ok(std::mem::replace(&mut self.elements[index], value))
    }

    /// Removes every element; returns how many there were.
    pub fn clear(&mut self) -> usize {
        let removed = self.elements.len();
        self.elements.clear();
        self.pending = 0;
        self.first_key = None;
        self.last_key = None;
        removed
    }

    /// Resorts, then returns an independent copy.
    ///
    /// The copy owns its own elements and shares the key extractor, the
    /// error sink and the threshold settings.
    #[must_use]
    pub fn copy(&mut self) -> Self
    where
        T: Clone,
    {
        self.restore_sorted_order();
        self.derive_sorted(self.elements.clone())
    }
}

impl<T: Ord + Clone> Default for SortedList<T, Identity> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K> Clone for SortedList<T, K>
where
    T: Clone,
    K: KeyExtractor<T>,
    K::Key: Clone,
{
    fn clone(&self) -> Self {
        Self {
            elements: self.elements.clone(),
            pending: self.pending,
            first_key: self.first_key.clone(),
            last_key: self.last_key.clone(),
            threshold: self.threshold,
            key: Rc::clone(&self.key),
            sink: Rc::clone(&self.sink),
        }
    }
}

impl<T: fmt::Debug, K: KeyExtractor<T>> fmt::Debug for SortedList<T, K> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SortedList")
            .field("threshold", &self.threshold)
            .field("pending", &self.pending)
            .field("elements", &self.elements)
            .finish()
    }
}

impl<T: Ord + Clone> FromIterator<T> for SortedList<T, Identity> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_iter_with_key(iter, Identity)
    }
}

impl<T, K: KeyExtractor<T>> Extend<T> for SortedList<T, K> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.merge(iter);
    }
}

impl<T, K: KeyExtractor<T>> IntoIterator for SortedList<T, K> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_sorted_vec().into_iter()
    }
}

impl<'a, T, K: KeyExtractor<T>> IntoIterator for &'a mut SortedList<T, K> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

static_assertions::assert_not_impl_any!(SortedList<i32>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::RefCell;

    fn lazy_list() -> SortedList<i32> {
        SortedList::new().with_threshold(ThresholdPolicy::new(1.0, 1_000).unwrap())
    }

    /// Builds `[lower, upper]` plus interior pending values.
    fn with_pending(lower: i32, upper: i32, pending: &[i32]) -> SortedList<i32> {
        let mut list = lazy_list();
        list.add(lower);
        list.add(upper);
        for value in pending {
            list.add(*value);
        }
        list
    }

    // =========================================================================
    // add / insert
    // =========================================================================

    #[rstest]
    fn test_add_boundary_keys_never_pend() {
        let mut list = lazy_list();
        for value in [5, 3, 8, 1, 9] {
            list.add(value);
        }
        assert_eq!(list.pending_len(), 0);
        assert_eq!(list.elements, vec![1, 3, 5, 8, 9]);
    }

    #[rstest]
    fn test_add_interior_key_goes_to_pending_tail() {
        let list = with_pending(0, 10, &[5, 2]);
        assert_eq!(list.pending_len(), 2);
        assert_eq!(list.sorted_len(), 2);
        assert_eq!(list.elements, vec![0, 10, 5, 2]);
    }

    #[rstest]
    fn test_add_keeps_extremes_exact_while_pending() {
        let mut list = with_pending(0, 10, &[5, 2, 7]);
        assert_eq!(list.first_key(), Some(&0));
        assert_eq!(list.last_key(), Some(&10));
        list.add(-1);
        list.add(11);
        assert_eq!(list.first_key(), Some(&-1));
        assert_eq!(list.last_key(), Some(&11));
        assert_eq!(list.to_vec(), vec![-1, 0, 2, 5, 7, 10, 11]);
    }

    #[rstest]
    fn test_add_key_equal_to_extreme_is_not_pending() {
        let mut list = with_pending(0, 10, &[]);
        list.add(10);
        list.add(0);
        assert_eq!(list.pending_len(), 0);
    }

    #[rstest]
    fn test_add_triggers_resort_on_threshold() {
        let mut list = SortedList::new().with_threshold(ThresholdPolicy::new(2.0 / 3.0, 2).unwrap());
        list.add(1);
        list.add(10);
        list.add(5);
        assert_eq!(list.pending_len(), 1);
        list.add(6);
        assert_eq!(list.pending_len(), 0);
        assert_eq!(list.elements, vec![1, 5, 6, 10]);
    }

    #[rstest]
    fn test_insert_interior_is_sorted_immediately() {
        let mut list = with_pending(0, 10, &[7]);
        list.insert(4);
        assert_eq!(list.pending_len(), 0);
        assert_eq!(list.elements, vec![0, 4, 7, 10]);
    }

    #[rstest]
    fn test_insert_goes_after_equal_keys() {
        let mut list = SortedList::with_key(|pair: &(i32, char)| pair.0);
        list.add((0, 'a'));
        list.add((5, 'a'));
        list.add((9, 'a'));
        list.insert((5, 'b'));
        assert_eq!(list.elements, vec![(0, 'a'), (5, 'a'), (5, 'b'), (9, 'a')]);
    }

    // =========================================================================
    // restore_sorted_order
    // =========================================================================

    #[rstest]
    fn test_restore_reports_merged_count_and_is_idempotent() {
        let mut list = with_pending(0, 10, &[3, 6, 1]);
        assert_eq!(list.restore_sorted_order(), 3);
        let once = list.elements.clone();
        assert_eq!(list.restore_sorted_order(), 0);
        assert_eq!(list.elements, once);
    }

    #[rstest]
    fn test_restore_is_stable_for_equal_keys() {
        let mut list = SortedList::with_key(|pair: &(i32, char)| pair.0)
            .with_threshold(ThresholdPolicy::new(1.0, 100).unwrap());
        for pair in [(0, 'x'), (9, 'x'), (4, 'a'), (4, 'b'), (4, 'c')] {
            list.add(pair);
        }
        let values: Vec<char> = list.iter().map(|pair| pair.1).collect();
        assert_eq!(values, vec!['x', 'a', 'b', 'c', 'x']);
    }

    // =========================================================================
    // reads
    // =========================================================================

    #[rstest]
    fn test_reads_force_resort() {
        let mut list = with_pending(0, 10, &[5]);
        assert!(list.contains(&5));
        assert_eq!(list.pending_len(), 0);

        let mut list = with_pending(0, 10, &[5]);
        assert_eq!(list.get(1), Some(&5));

        let mut list = with_pending(0, 10, &[5]);
        assert_eq!(list.last(), Some(&10));
    }

    #[rstest]
    fn test_at_supports_negative_indexes() {
        let mut list: SortedList<i32> = [30, 10, 20].into_iter().collect();
        assert_eq!(list.at(0), Ok(&10));
        assert_eq!(list.at(-1), Ok(&30));
        assert_eq!(list.at(-3), Ok(&10));
        assert_eq!(
            list.at(-4),
            Err(SortedListError::IndexOutOfRange { index: -4, len: 3 })
        );
    }

    #[rstest]
    fn test_count_and_index_of_use_value_equality() {
        let mut list = SortedList::from_iter_with_key(
            [(1, 'a'), (1, 'b'), (1, 'a'), (2, 'a')],
            |pair: &(i32, char)| pair.0,
        );
        assert_eq!(list.count(&(1, 'a')), 2);
        assert_eq!(list.count(&(2, 'b')), 0);
        assert_eq!(list.index_of(&(1, 'b')), Some(1));
    }

    #[rstest]
    fn test_slice_by_key_bounds_shares_configuration() {
        let mut list = lazy_list();
        list.merge([1, 9, 2, 8, 3, 7]);
        let mut middle = list.slice(2..=7);
        assert_eq!(middle.threshold(), list.threshold());
        assert_eq!(middle.to_vec(), vec![2, 3, 7]);
    }

    #[rstest]
    fn test_slice_positions_checks_bounds() {
        let mut list: SortedList<i32> = [4, 3, 2, 1].into_iter().collect();
        assert_eq!(list.slice_positions(1..3).unwrap().to_vec(), vec![2, 3]);
        assert_eq!(list.slice_positions(..=0).unwrap().to_vec(), vec![1]);
        assert_eq!(list.slice_positions(2..).unwrap().to_vec(), vec![3, 4]);
        assert_eq!(
            list.slice_positions(3..9).unwrap_err(),
            SortedListError::IndexOutOfRange { index: 9, len: 4 }
        );
    }

    #[rstest]
    #[case(5, 3)]
    #[case(3, 1)]
    fn test_slice_positions_inverted_range_reports_start(#[case] start: usize, #[case] end: usize) {
        let mut list: SortedList<i32> = [4, 3, 2, 1].into_iter().collect();
        assert_eq!(
            list.slice_positions(start..end).unwrap_err(),
            SortedListError::IndexOutOfRange {
                index: isize::try_from(start).unwrap(),
                len: 4
            }
        );
    }

    // =========================================================================
    // removal
    // =========================================================================

    #[rstest]
    fn test_remove_refreshes_extremes() {
        let mut list: SortedList<i32> = [1, 5, 9].into_iter().collect();
        assert_eq!(list.remove(&9), Ok(9));
        assert_eq!(list.last_key(), Some(&5));
        assert_eq!(list.remove(&1), Ok(1));
        assert_eq!(list.first_key(), Some(&5));
        assert_eq!(list.remove(&5), Ok(5));
        assert_eq!(list.first_key(), None);
        assert_eq!(list.last_key(), None);
    }

    #[rstest]
    fn test_remove_absent_reports_to_sink() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let recorder = Rc::clone(&seen);
        let mut list: SortedList<i32> = [1, 2].into_iter().collect();
        list.set_error_sink(move |error: &SortedListError| recorder.borrow_mut().push(error.clone()));

        assert!(list.remove(&3).is_err());
        assert_eq!(list.discard(&3), None);
        assert_eq!(
            seen.borrow().as_slice(),
            &[SortedListError::NotFound { operation: "remove" }]
        );
    }

    #[rstest]
    fn test_remove_all_only_touches_equal_values() {
        let mut list = SortedList::from_iter_with_key(
            [(1, 'a'), (2, 'a'), (2, 'b'), (2, 'a'), (3, 'a')],
            |pair: &(i32, char)| pair.0,
        );
        assert_eq!(list.remove_all(&(2, 'a')), 2);
        assert_eq!(list.to_vec(), vec![(1, 'a'), (2, 'b'), (3, 'a')]);
        assert_eq!(list.remove_all(&(2, 'z')), 0);
    }

    #[rstest]
    fn test_remove_key_removes_whole_group() {
        let mut list: SortedList<i32> = [1, 2, 2, 2, 3].into_iter().collect();
        assert_eq!(list.remove_key(&2), 3);
        assert_eq!(list.remove_key(&2), 0);
        assert_eq!(list.to_vec(), vec![1, 3]);
    }

    #[rstest]
    fn test_remove_all_identical_ignores_equal_twins() {
        let shared = Rc::new(4);
        let mut list = SortedList::new();
        list.merge([Rc::new(1), Rc::clone(&shared), Rc::new(4), Rc::clone(&shared)]);
        assert_eq!(list.remove_all_identical(&shared), 2);
        assert_eq!(list.len(), 2);
        assert_eq!(list.count(&Rc::new(4)), 1);
    }

    #[rstest]
    fn test_pop_variants() {
        let mut list: SortedList<i32> = [2, 1, 3].into_iter().collect();
        assert_eq!(list.pop(), Ok(3));
        assert_eq!(list.last_key(), Some(&2));
        assert_eq!(list.pop_at(0), Ok(1));
        assert_eq!(list.first_key(), Some(&2));
        assert_eq!(
            list.pop_at(5),
            Err(SortedListError::IndexOutOfRange { index: 5, len: 1 })
        );
        assert_eq!(list.pop(), Ok(2));
        assert_eq!(list.pop(), Err(SortedListError::NotFound { operation: "pop" }));
        assert_eq!(list.pop_or_else(-1, || 42), 42);
    }

    #[rstest]
    fn test_replace_at_accepts_same_key_only() {
        let mut list = SortedList::from_iter_with_key([(1, 'a'), (2, 'a')], |pair: &(i32, char)| pair.0);
        assert_eq!(list.replace_at(1, (2, 'z')), Ok((2, 'a')));
        assert_eq!(
            list.replace_at(0, (5, 'a')),
            Err(SortedListError::ReadOnlyViolation { operation: "replace_at" })
        );
        assert!(matches!(
            list.replace_at(2, (3, 'a')),
            Err(SortedListError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert_eq!(list.to_vec(), vec![(1, 'a'), (2, 'z')]);
    }

    #[rstest]
    fn test_clear_resets_state() {
        let mut list = with_pending(0, 10, &[4, 5]);
        assert_eq!(list.clear(), 4);
        assert!(list.is_empty());
        assert_eq!(list.pending_len(), 0);
        assert_eq!(list.first_key(), None);
        list.add(3);
        assert_eq!(list.first_key(), Some(&3));
        assert_eq!(list.last_key(), Some(&3));
    }

    // =========================================================================
    // configuration and copies
    // =========================================================================

    #[rstest]
    fn test_set_threshold_parts_keeps_unspecified_part() {
        let mut list = lazy_list();
        list.set_threshold_parts(Some(0.25), None).unwrap();
        assert_eq!(list.threshold().fraction(), 0.25);
        assert_eq!(list.threshold().absolute(), 1_000);
        assert!(list.set_threshold_parts(Some(-1.0), Some(3)).is_err());
        assert_eq!(list.threshold().absolute(), 1_000);
    }

    #[rstest]
    fn test_copy_is_independent_and_shares_extractor() {
        let mut list = with_pending(0, 10, &[5]);
        let mut copy = list.copy();
        assert_eq!(list.pending_len(), 0);
        assert!(std::ptr::eq(list.key_extractor(), copy.key_extractor()));
        copy.add(20);
        assert_eq!(list.len(), 3);
        assert_eq!(copy.to_vec(), vec![0, 5, 10, 20]);
    }

    #[rstest]
    fn test_debug_shows_pending_count_without_resorting() {
        let list = with_pending(0, 10, &[5]);
        let rendered = format!("{list:?}");
        assert!(rendered.contains("pending: 1"));
        assert!(rendered.contains("elements: [0, 10, 5]"));
        assert_eq!(list.pending_len(), 1);
    }

    #[rstest]
    fn test_into_iterator_yields_sorted_elements() {
        let list = with_pending(0, 10, &[7, 3]);
        let collected: Vec<i32> = list.into_iter().collect();
        assert_eq!(collected, vec![0, 3, 7, 10]);
    }
}
