//! Containers that vet every incoming element.
//!
//! A [`CheckedSortedList`] passes each raw input through a [`Vetter`] before
//! it reaches the inner [`SortedList`]. The vetter may validate, convert or
//! reject; a rejection is returned unchanged and leaves the container as it
//! was.
//!
//! [`TypedSortedList`] is the common case of a vetter that only converts:
//! any input implementing `TryInto<T>` is accepted, and a failed conversion
//! becomes [`SortedListError::TypeMismatch`].
//!
//! # Examples
//!
//! ```rust
//! use lazysorted::{SortedListError, TypedSortedList};
//!
//! let mut bytes: TypedSortedList<u8> = TypedSortedList::typed();
//! bytes.add(200_i32).unwrap();
//! bytes.add(7_u64).unwrap();
//! assert!(matches!(bytes.add(-1_i32), Err(SortedListError::TypeMismatch { .. })));
//! assert_eq!(bytes.to_vec(), vec![7, 200]);
//! ```

use super::SortedList;
use super::range::SortedView;
use crate::error::{ErrorSink, Result, SortedListError};
use crate::key::{Identity, KeyExtractor};
use crate::threshold::ThresholdPolicy;
use std::fmt;
use std::ops::Range;

/// Validates or converts a raw input into an element.
pub trait Vetter<Raw, T> {
    /// The rejection reported to the caller.
    type Error;

    /// Accepts `raw` as an element or rejects it.
    ///
    /// # Errors
    ///
    /// Returns the vetter's own error when `raw` is not acceptable.
    fn vet(&self, raw: Raw) -> std::result::Result<T, Self::Error>;

    /// The container error a rejection stands for, if any.
    ///
    /// Rejections that map to a [`SortedListError`] pass through the
    /// container's error sink before they are returned. Closure vetters
    /// keep their errors to themselves.
    #[inline]
    fn signaled(_error: &Self::Error) -> Option<&SortedListError> {
        None
    }
}

impl<Raw, T, E, F> Vetter<Raw, T> for F
where
    F: Fn(Raw) -> std::result::Result<T, E>,
{
    type Error = E;

    #[inline]
    fn vet(&self, raw: Raw) -> std::result::Result<T, E> {
        self(raw)
    }
}

/// Converts any `Raw: TryInto<T>` and rejects failed conversions as
/// [`SortedListError::TypeMismatch`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Convert;

impl<Raw, T> Vetter<Raw, T> for Convert
where
    Raw: TryInto<T>,
{
    type Error = SortedListError;

    fn vet(&self, raw: Raw) -> Result<T> {
        raw.try_into().map_err(|_| SortedListError::TypeMismatch {
            expected: std::any::type_name::<T>(),
            found: std::any::type_name::<Raw>(),
        })
    }

    fn signaled(error: &SortedListError) -> Option<&SortedListError> {
        Some(error)
    }
}

/// A [`SortedList`] whose insertions go through a [`Vetter`].
///
/// # Type Parameters
///
/// * `T` - The stored element type.
/// * `K` - The key extractor.
/// * `V` - The vetter; each method accepts any `Raw` with `V: Vetter<Raw, T>`.
pub struct CheckedSortedList<T, K = Identity, V = Convert>
where
    K: KeyExtractor<T>,
{
    list: SortedList<T, K>,
    vetter: V,
}

/// A container accepting anything convertible into `T`.
pub type TypedSortedList<T, K = Identity> = CheckedSortedList<T, K, Convert>;

impl<T: Ord + Clone> CheckedSortedList<T, Identity, Convert> {
    /// Creates an empty, identity-ordered container that converts its inputs.
    #[must_use]
    pub fn typed() -> Self {
        Self::with_vetter(SortedList::new(), Convert)
    }
}

impl<T, K, V> CheckedSortedList<T, K, V>
where
    K: KeyExtractor<T>,
{
    /// Wraps `list`; it may already hold elements, which are not re-vetted.
    #[must_use]
    pub fn with_vetter(list: SortedList<T, K>, vetter: V) -> Self {
        Self { list, vetter }
    }

    /// Vets `raw`, then adds it like [`SortedList::add`].
    ///
    /// # Errors
    ///
    /// Returns the vetter's error; the container is unchanged.
    pub fn add<Raw>(&mut self, raw: Raw) -> std::result::Result<(), V::Error>
    where
        V: Vetter<Raw, T>,
    {
        let item = self.vetted(raw)?;
        self.list.add(item);
        Ok(())
    }

    /// Vets `raw`, then inserts it like [`SortedList::insert`].
    ///
    /// # Errors
    ///
    /// Returns the vetter's error; the container is unchanged.
    pub fn insert<Raw>(&mut self, raw: Raw) -> std::result::Result<(), V::Error>
    where
        V: Vetter<Raw, T>,
    {
        let item = self.vetted(raw)?;
        self.list.insert(item);
        Ok(())
    }

    /// Vets every input, then adds them all.
    ///
    /// Nothing is added unless every input passes.
    ///
    /// # Errors
    ///
    /// Returns the first rejection; the container is unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazysorted::{CheckedSortedList, SortedList};
    ///
    /// let even = |raw: i32| if raw % 2 == 0 { Ok(raw) } else { Err(raw) };
    /// let mut list: CheckedSortedList<i32, _, _> = CheckedSortedList::with_vetter(SortedList::new(), even);
    /// assert_eq!(list.merge([2, 4, 5, 6]), Err(5));
    /// assert!(list.is_empty());
    /// ```
    pub fn merge<Raw, I>(&mut self, raws: I) -> std::result::Result<(), V::Error>
    where
        V: Vetter<Raw, T>,
        I: IntoIterator<Item = Raw>,
    {
        let items = raws
            .into_iter()
            .map(|raw| self.vetted(raw))
            .collect::<std::result::Result<Vec<T>, V::Error>>()?;
        self.list.merge(items);
        Ok(())
    }

    /// Replaces every copy of `old` with a vetted `new`.
    ///
    /// # Errors
    ///
    /// Returns the vetter's error before anything is removed.
    pub fn replace<Raw>(&mut self, old: &T, new: Raw) -> std::result::Result<usize, V::Error>
    where
        V: Vetter<Raw, T>,
        T: PartialEq + Clone,
    {
        let item = self.vetted(new)?;
        Ok(self.list.replace(old, item))
    }

    /// Vets `value`, then overwrites the element at `index` like
    /// [`SortedList::replace_at`].
    ///
    /// # Errors
    ///
    /// Returns the vetter's error, or the container's
    /// [`SortedListError`] converted into it.
    pub fn replace_at<Raw>(&mut self, index: usize, value: Raw) -> std::result::Result<T, V::Error>
    where
        V: Vetter<Raw, T>,
        V::Error: From<SortedListError>,
    {
        let item = self.vetted(value)?;
        Ok(self.list.replace_at(index, item)?)
    }

    /// Runs the vetter, passing signaled rejections to the sink.
    fn vetted<Raw>(&self, raw: Raw) -> std::result::Result<T, V::Error>
    where
        V: Vetter<Raw, T>,
    {
        self.vetter.vet(raw).map_err(|error| {
            if let Some(signal) = <V as Vetter<Raw, T>>::signaled(&error) {
                self.list.notify(signal);
            }
            error
        })
    }

    /// The vetter.
    #[inline]
    #[must_use]
    pub const fn vetter(&self) -> &V {
        &self.vetter
    }
}

impl<T, K, V> CheckedSortedList<T, K, V>
where
    K: KeyExtractor<T>,
{
    /// The wrapped container.
    #[inline]
    #[must_use]
    pub const fn as_list(&self) -> &SortedList<T, K> {
        &self.list
    }

    /// Unwraps the container, dropping the vetter.
    #[must_use]
    pub fn into_list(self) -> SortedList<T, K> {
        self.list
    }

    /// See [`SortedList::len`].
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// See [`SortedList::is_empty`].
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// See [`SortedList::pending_len`].
    #[inline]
    #[must_use]
    pub const fn pending_len(&self) -> usize {
        self.list.pending_len()
    }

    /// See [`SortedList::threshold`].
    #[inline]
    #[must_use]
    pub const fn threshold(&self) -> ThresholdPolicy {
        self.list.threshold()
    }

    /// See [`SortedList::set_threshold`].
    pub fn set_threshold(&mut self, threshold: ThresholdPolicy) {
        self.list.set_threshold(threshold);
    }

    /// See [`SortedList::set_error_sink`].
    pub fn set_error_sink<S: ErrorSink + 'static>(&mut self, sink: S) {
        self.list.set_error_sink(sink);
    }

    /// See [`SortedList::restore_sorted_order`].
    pub fn restore_sorted_order(&mut self) -> usize {
        self.list.restore_sorted_order()
    }

    /// See [`SortedList::view`].
    pub fn view(&mut self) -> SortedView<'_, T, K> {
        self.list.view()
    }

    /// See [`SortedList::iter`].
    pub fn iter(&mut self) -> std::slice::Iter<'_, T> {
        self.list.iter()
    }

    /// See [`SortedList::to_vec`].
    pub fn to_vec(&mut self) -> Vec<T>
    where
        T: Clone,
    {
        self.list.to_vec()
    }

    /// See [`SortedList::find_key_range`].
    pub fn find_key_range(&mut self, key: &K::Key) -> Range<usize> {
        self.list.find_key_range(key)
    }

    /// See [`SortedList::contains`].
    pub fn contains(&mut self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.list.contains(item)
    }

    /// See [`SortedList::remove`].
    ///
    /// # Errors
    ///
    /// [`SortedListError::NotFound`] if no element is equal to `item`.
    pub fn remove(&mut self, item: &T) -> Result<T>
    where
        T: PartialEq,
    {
        self.list.remove(item)
    }

    /// See [`SortedList::discard`].
    pub fn discard(&mut self, item: &T) -> Option<T>
    where
        T: PartialEq,
    {
        self.list.discard(item)
    }

    /// See [`SortedList::remove_all`].
    pub fn remove_all(&mut self, item: &T) -> usize
    where
        T: PartialEq,
    {
        self.list.remove_all(item)
    }

    /// See [`SortedList::remove_key`].
    pub fn remove_key(&mut self, key: &K::Key) -> usize {
        self.list.remove_key(key)
    }

    /// See [`SortedList::pop_at`].
    ///
    /// # Errors
    ///
    /// Same as [`SortedList::pop_at`].
    pub fn pop_at(&mut self, index: isize) -> Result<T> {
        self.list.pop_at(index)
    }

    /// See [`SortedList::clear`].
    pub fn clear(&mut self) -> usize {
        self.list.clear()
    }
}

impl<T, K, V> fmt::Debug for CheckedSortedList<T, K, V>
where
    T: fmt::Debug,
    K: KeyExtractor<T>,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CheckedSortedList")
            .field("list", &self.list)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, PartialEq)]
    enum Rejection {
        Negative(i64),
        Container(SortedListError),
    }

    impl From<SortedListError> for Rejection {
        fn from(error: SortedListError) -> Self {
            Self::Container(error)
        }
    }

    type NonNegative = fn(i64) -> std::result::Result<u32, Rejection>;

    fn non_negative(raw: i64) -> std::result::Result<u32, Rejection> {
        u32::try_from(raw).map_err(|_| Rejection::Negative(raw))
    }

    fn vetted() -> CheckedSortedList<u32, Identity, NonNegative> {
        CheckedSortedList::with_vetter(SortedList::new(), non_negative as NonNegative)
    }

    #[rstest]
    fn test_convert_reports_type_names() {
        let error = Vetter::<i32, u8>::vet(&Convert, 300).unwrap_err();
        assert_eq!(
            error,
            SortedListError::TypeMismatch {
                expected: "u8",
                found: "i32"
            }
        );
    }

    #[rstest]
    fn test_rejection_leaves_container_untouched() {
        let mut list = vetted();
        list.add(3).unwrap();
        assert_eq!(list.add(-3), Err(Rejection::Negative(-3)));
        assert_eq!(list.insert(-1), Err(Rejection::Negative(-1)));
        assert_eq!(list.to_vec(), vec![3]);
    }

    #[rstest]
    fn test_merge_is_all_or_nothing() {
        let mut list = vetted();
        assert!(list.merge([1, 2, -5]).is_err());
        assert!(list.is_empty());
        list.merge([9, 1, 4]).unwrap();
        assert_eq!(list.to_vec(), vec![1, 4, 9]);
    }

    #[rstest]
    fn test_replace_vets_before_removing() {
        let mut list = vetted();
        list.merge([1, 2, 2]).unwrap();
        assert!(list.replace(&2, -1).is_err());
        assert_eq!(list.replace(&2, 7), Ok(2));
        assert_eq!(list.to_vec(), vec![1, 7, 7]);
    }

    #[rstest]
    fn test_replace_at_surfaces_container_errors() {
        let mut list = vetted();
        list.merge([1, 2]).unwrap();
        assert_eq!(
            list.replace_at(0, 5),
            Err(Rejection::Container(SortedListError::ReadOnlyViolation {
                operation: "replace_at"
            }))
        );
        assert_eq!(list.replace_at(0, 1), Ok(1));
    }

    #[rstest]
    fn test_typed_list_converts_inputs() {
        let mut list: TypedSortedList<i16> = TypedSortedList::typed();
        list.add(5_i8).unwrap();
        list.add(-7_i64).unwrap();
        assert!(list.add(70_000_i32).is_err());
        assert_eq!(list.to_vec(), vec![-7, 5]);
    }

    #[rstest]
    fn test_typed_rejections_pass_through_sink() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let recorder = Rc::clone(&seen);
        let mut list: TypedSortedList<u8> = TypedSortedList::typed();
        list.set_error_sink(move |error: &SortedListError| recorder.borrow_mut().push(error.clone()));

        let mismatch = SortedListError::TypeMismatch {
            expected: "u8",
            found: "i32",
        };
        assert_eq!(list.add(-1_i32), Err(mismatch.clone()));
        assert_eq!(list.insert(300_i32), Err(mismatch.clone()));
        assert_eq!(list.merge([1_i32, 999]), Err(mismatch.clone()));
        list.add(4_i32).unwrap();
        assert_eq!(list.replace(&4, -4_i32), Err(mismatch.clone()));

        assert_eq!(seen.borrow().len(), 4);
        assert!(seen.borrow().iter().all(|error| *error == mismatch));
        assert_eq!(list.to_vec(), vec![4]);
    }

    #[rstest]
    fn test_closure_rejections_skip_sink() {
        let seen = Rc::new(RefCell::new(0));
        let recorder = Rc::clone(&seen);
        let mut list = vetted();
        list.set_error_sink(move |_: &SortedListError| *recorder.borrow_mut() += 1);
        assert!(list.add(-2).is_err());
        assert_eq!(*seen.borrow(), 0);
    }
}
