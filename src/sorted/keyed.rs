//! Sets holding at most one element per key.
//!
//! [`SortedKeyedSet`] consults a [`DuplicatePolicy`] whenever an element
//! arrives whose key is already present. [`SortedSet`] is the value-keyed
//! special case that either ignores or rejects duplicates.
//!
//! # Examples
//!
//! ```rust
//! use lazysorted::{DuplicatePolicy, SortedKeyedSet};
//!
//! let mut latest = SortedKeyedSet::with_key(|entry: &(u32, &str)| entry.0);
//! assert_eq!(latest.policy(), &DuplicatePolicy::KeepNew);
//!
//! latest.add((5, "old")).unwrap();
//! latest.add((5, "new")).unwrap();
//! assert_eq!(latest.to_vec(), vec![(5, "new")]);
//! ```

use super::SortedList;
use super::range::SortedView;
use crate::error::{ErrorSink, Result, SortedListError};
use crate::key::{Identity, KeyExtractor, SameIdentity};
use crate::threshold::ThresholdPolicy;
use std::fmt;
use std::ops::RangeBounds;
use std::str::FromStr;

/// What a keyed set does when an element arrives whose key is present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Reject every duplicate key.
    Fail,
    /// Keep the stored element, drop the new one.
    KeepOld,
    /// Replace the stored element unless the two are equal.
    #[default]
    KeepNew,
    /// Accept the new element only if it equals the stored one.
    RequireSameValue,
    /// Accept the new element only if it is the stored object itself.
    RequireSameIdentity,
    /// Left behind by an unrecognized tag; every insertion fails until a
    /// valid policy is set.
    Invalid(String),
}

static POLICY_TAGS: [(&str, DuplicatePolicy); 10] = [
    ("fail", DuplicatePolicy::Fail),
    ("old", DuplicatePolicy::KeepOld),
    ("new", DuplicatePolicy::KeepNew),
    ("value", DuplicatePolicy::RequireSameValue),
    ("same", DuplicatePolicy::RequireSameIdentity),
    ("identity", DuplicatePolicy::RequireSameIdentity),
    ("keep-old", DuplicatePolicy::KeepOld),
    ("keep-new", DuplicatePolicy::KeepNew),
    ("require-same-value", DuplicatePolicy::RequireSameValue),
    ("require-same-identity", DuplicatePolicy::RequireSameIdentity),
];

impl FromStr for DuplicatePolicy {
    type Err = SortedListError;

    /// Parses a policy tag.
    ///
    /// Matching ignores case and accepts any prefix that selects a single
    /// policy, so `"n"`, `"New"` and `"keep-n"` all mean
    /// [`DuplicatePolicy::KeepNew`].
    ///
    /// # Errors
    ///
    /// [`SortedListError::ConfigurationError`] for an empty, unknown or
    /// ambiguous tag.
    fn from_str(tag: &str) -> Result<Self> {
        let lowered = tag.trim().to_ascii_lowercase();
        let unknown = || SortedListError::ConfigurationError {
            tag: tag.to_string(),
        };
        if lowered.is_empty() {
            return Err(unknown());
        }
        if let Some((_, policy)) = POLICY_TAGS.iter().find(|(name, _)| *name == lowered) {
            return Ok(policy.clone());
        }
        let mut candidates = POLICY_TAGS
            .iter()
            .filter(|(name, _)| name.starts_with(&lowered))
            .map(|(_, policy)| policy);
        let first = candidates.next().ok_or_else(unknown)?;
        if candidates.all(|policy| policy == first) {
            Ok(first.clone())
        } else {
            Err(unknown())
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Fail => "fail",
            Self::KeepOld => "old",
            Self::KeepNew => "new",
            Self::RequireSameValue => "value",
            Self::RequireSameIdentity => "same",
            Self::Invalid(_) => "error",
        };
        formatter.write_str(tag)
    }
}

fn same_address<T>(left: &T, right: &T) -> bool {
    std::ptr::eq(left, right)
}

/// A sorted container holding at most one element per key.
///
/// # Examples
///
/// ```rust
/// use lazysorted::{DuplicatePolicy, SortedKeyedSet, SortedListError};
///
/// let mut ids = SortedKeyedSet::with_key(|user: &(u32, &str)| user.0)
///     .with_policy(DuplicatePolicy::Fail);
/// ids.add((7, "ann")).unwrap();
/// assert!(matches!(
///     ids.add((7, "bob")),
///     Err(SortedListError::DuplicateKeyViolation { .. })
/// ));
/// ```
pub struct SortedKeyedSet<T, K = Identity>
where
    K: KeyExtractor<T>,
{
    list: SortedList<T, K>,
    policy: DuplicatePolicy,
    identity: fn(&T, &T) -> bool,
}

impl<T, K: KeyExtractor<T>> SortedKeyedSet<T, K> {
    /// Creates an empty set keyed by `key`, with the
    /// [`DuplicatePolicy::KeepNew`] policy.
    ///
    /// Identity defaults to address equality, under which an element moved
    /// into the set is never the same object as a new one. Use
    /// [`SortedKeyedSet::new_shared`] or [`SortedKeyedSet::with_identity`]
    /// to compare shared handles.
    #[must_use]
    pub fn with_key(key: K) -> Self {
        Self {
            list: SortedList::with_key(key),
            policy: DuplicatePolicy::default(),
            identity: same_address::<T>,
        }
    }

    /// Creates an empty set whose identity test is [`SameIdentity`].
    #[must_use]
    pub fn new_shared(key: K) -> Self
    where
        T: SameIdentity,
    {
        Self::with_key(key).with_identity(T::same_identity)
    }

    /// Sets the duplicate policy (builder style).
    #[must_use]
    pub fn with_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the identity test used by [`DuplicatePolicy::RequireSameIdentity`]
    /// (builder style).
    #[must_use]
    pub fn with_identity(mut self, identity: fn(&T, &T) -> bool) -> Self {
        self.identity = identity;
        self
    }

    /// Sets the resort threshold of the underlying list (builder style).
    #[must_use]
    pub fn with_threshold(mut self, threshold: ThresholdPolicy) -> Self {
        self.list.set_threshold(threshold);
        self
    }

    /// Routes every error through `sink` (builder style).
    #[must_use]
    pub fn with_error_sink<S: ErrorSink + 'static>(mut self, sink: S) -> Self {
        self.list.set_error_sink(sink);
        self
    }

    /// Builds a set by adding every item in order.
    ///
    /// # Errors
    ///
    /// The first error [`SortedKeyedSet::add`] returns.
    pub fn from_iter_with<I>(items: I, key: K, policy: DuplicatePolicy) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: PartialEq,
        K::Key: fmt::Debug,
    {
        let mut set = Self::with_key(key).with_policy(policy);
        set.merge(items)?;
        Ok(set)
    }

    /// The current duplicate policy.
    #[inline]
    #[must_use]
    pub const fn policy(&self) -> &DuplicatePolicy {
        &self.policy
    }

    /// Replaces the duplicate policy.
    pub fn set_policy(&mut self, policy: DuplicatePolicy) {
        self.policy = policy;
    }

    /// Replaces the duplicate policy with the one named by `tag`.
    ///
    /// # Errors
    ///
    /// [`SortedListError::ConfigurationError`] for an unrecognized tag. The
    /// policy becomes [`DuplicatePolicy::Invalid`], so later insertions fail
    /// until a valid policy is set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazysorted::{DuplicatePolicy, SortedKeyedSet};
    ///
    /// let mut set = SortedKeyedSet::with_key(|value: &i32| *value);
    /// set.set_policy_tag("VAL").unwrap();
    /// assert_eq!(set.policy(), &DuplicatePolicy::RequireSameValue);
    ///
    /// assert!(set.set_policy_tag("bogus").is_err());
    /// assert!(set.add(1).is_err());
    /// ```
    pub fn set_policy_tag(&mut self, tag: &str) -> Result<()> {
        match tag.parse() {
            Ok(policy) => {
                self.policy = policy;
                Ok(())
            }
            Err(error) => {
                self.policy = DuplicatePolicy::Invalid(tag.to_string());
                Err(self.list.report(error))
            }
        }
    }

    /// Index of the stored element sharing `key`, if any.
    fn position_of_key(&mut self, key: &K::Key) -> Option<usize> {
        let view = self.list.view();
        view.bisect_right(key)
            .checked_sub(1)
            .filter(|&index| view.key_of(&view[index]) == *key)
    }

    /// Adds `item`, applying the duplicate policy if its key is present.
    ///
    /// Returns `Ok(true)` when the set changed and `Ok(false)` when the item
    /// was dropped in favour of the stored element.
    ///
    /// # Errors
    ///
    /// - [`SortedListError::DuplicateKeyViolation`] when the policy refuses
    ///   the item.
    /// - [`SortedListError::ConfigurationError`] while the policy is
    ///   [`DuplicatePolicy::Invalid`].
    pub fn add(&mut self, item: T) -> Result<bool>
    where
        T: PartialEq,
        K::Key: fmt::Debug,
    {
        if let DuplicatePolicy::Invalid(tag) = &self.policy {
            let error = SortedListError::ConfigurationError { tag: tag.clone() };
            return Err(self.list.report(error));
        }

        let key = self.list.key_of(&item);
        let Some(index) = self.position_of_key(&key) else {
            self.list.add(item);
            return Ok(true);
        };

        let prior = &self.list.raw_slice()[index];
        let accepted = match self.policy {
            DuplicatePolicy::KeepOld => true,
            DuplicatePolicy::RequireSameValue => *prior == item,
            DuplicatePolicy::RequireSameIdentity => (self.identity)(prior, &item),
            DuplicatePolicy::KeepNew => {
                if *prior == item {
                    return Ok(false);
                }
                self.list.take_at(index);
                self.list.add(item);
                return Ok(true);
            }
            DuplicatePolicy::Fail | DuplicatePolicy::Invalid(_) => false,
        };
        if accepted {
            Ok(false)
        } else {
            let error = SortedListError::DuplicateKeyViolation {
                key: format!("{key:?}"),
            };
            Err(self.list.report(error))
        }
    }

    /// Adds every item in order; returns how many changed the set.
    ///
    /// # Errors
    ///
    /// Stops at the first error [`SortedKeyedSet::add`] returns; items
    /// added before it stay in the set.
    pub fn merge<I>(&mut self, items: I) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
        T: PartialEq,
        K::Key: fmt::Debug,
    {
        let mut changed = 0;
        for item in items {
            if self.add(item)? {
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// The element stored under `key`.
    pub fn get_by_key(&mut self, key: &K::Key) -> Option<&T> {
        let index = self.position_of_key(key)?;
        self.list.get(index)
    }

    /// Returns `true` if an element is stored under `key`.
    pub fn contains_key(&mut self, key: &K::Key) -> bool {
        self.position_of_key(key).is_some()
    }

    /// Removes and returns the element stored under `key`.
    pub fn remove_key(&mut self, key: &K::Key) -> Option<T> {
        let index = self.position_of_key(key)?;
        Some(self.list.take_at(index))
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

    /// See [`SortedList::pop_at`].
    ///
    /// # Errors
    ///
    /// Same as [`SortedList::pop_at`].
    pub fn pop_at(&mut self, index: isize) -> Result<T> {
        self.list.pop_at(index)
    }

    /// A new set with copies of the elements whose keys fall within
    /// `bounds`, sharing this set's policy.
    pub fn slice<B>(&mut self, bounds: B) -> Self
    where
        B: RangeBounds<K::Key>,
        T: Clone,
    {
        Self {
            list: self.list.slice(bounds),
            policy: self.policy.clone(),
            identity: self.identity,
        }
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

    /// See [`SortedList::contains`].
    pub fn contains(&mut self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.list.contains(item)
    }

    /// See [`SortedList::clear`].
    pub fn clear(&mut self) -> usize {
        self.list.clear()
    }

    /// The underlying list.
    #[inline]
    #[must_use]
    pub const fn as_list(&self) -> &SortedList<T, K> {
        &self.list
    }

    /// Unwraps the underlying list.
    #[must_use]
    pub fn into_list(self) -> SortedList<T, K> {
        self.list
    }
}

impl<T, K> SortedKeyedSet<T, K>
where
    T: Clone + PartialEq,
    K: KeyExtractor<T>,
{
    /// A set sharing this one's configuration, holding `list`.
    fn derive(&self, list: SortedList<T, K>) -> Self {
        Self {
            list,
            policy: self.policy.clone(),
            identity: self.identity,
        }
    }

    /// A new set holding the elements of `self`, then every element of each
    /// operand added through [`SortedKeyedSet::add`].
    ///
    /// # Errors
    ///
    /// The first error the duplicate policy raises; no set is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazysorted::{DuplicatePolicy, SortedKeyedSet};
    ///
    /// let key = |entry: &(u8, char)| entry.0;
    /// let mut left = SortedKeyedSet::from_iter_with([(1, 'a'), (2, 'a')], key, DuplicatePolicy::KeepNew).unwrap();
    /// let mut right = SortedKeyedSet::from_iter_with([(2, 'b'), (3, 'b')], key, DuplicatePolicy::KeepNew).unwrap();
    /// let mut union = left.union([&mut right]).unwrap();
    /// assert_eq!(union.to_vec(), vec![(1, 'a'), (2, 'b'), (3, 'b')]);
    /// ```
    pub fn union<'a, I>(&mut self, others: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a mut Self>,
        T: 'a,
        K: 'a,
        K::Key: fmt::Debug,
    {
        let copy = self.list.copy();
        let mut result = self.derive(copy);
        for other in others {
            result.merge(other.list.to_vec())?;
        }
        Ok(result)
    }

    /// Adds every element of each operand through [`SortedKeyedSet::add`];
    /// returns how many changed the set.
    ///
    /// # Errors
    ///
    /// Stops at the first error the duplicate policy raises; elements added
    /// before it stay in the set.
    pub fn update_union<'a, I>(&mut self, others: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a mut Self>,
        T: 'a,
        K: 'a,
        K::Key: fmt::Debug,
    {
        let mut changed = 0;
        for other in others {
            changed += self.merge(other.list.to_vec())?;
        }
        Ok(changed)
    }

    /// A new set with the elements of `self` equal to one in every operand.
    pub fn intersection<'a, I>(&mut self, others: I) -> Self
    where
        I: IntoIterator<Item = &'a mut Self>,
        T: 'a,
        K: 'a,
    {
        let list = self.list.intersection(others.into_iter().map(|other| &mut other.list));
        self.derive(list)
    }

    /// Keeps the elements of `self` equal to one in every operand.
    pub fn update_intersection<'a, I>(&mut self, others: I)
    where
        I: IntoIterator<Item = &'a mut Self>,
        T: 'a,
        K: 'a,
    {
        self.list
            .update_intersection(others.into_iter().map(|other| &mut other.list));
    }

    /// A new set with the elements of `self` equal to none in the operands.
    pub fn difference<'a, I>(&mut self, others: I) -> Self
    where
        I: IntoIterator<Item = &'a mut Self>,
        T: 'a,
        K: 'a,
    {
        let list = self.list.difference(others.into_iter().map(|other| &mut other.list));
        self.derive(list)
    }

    /// Removes the elements of `self` equal to one in any operand.
    pub fn update_difference<'a, I>(&mut self, others: I)
    where
        I: IntoIterator<Item = &'a mut Self>,
        T: 'a,
        K: 'a,
    {
        self.list
            .update_difference(others.into_iter().map(|other| &mut other.list));
    }

    /// A new set holding `self` minus the values shared with `other`, then
    /// every element of `other` added through [`SortedKeyedSet::add`].
    ///
    /// Values present in both sides survive once. A key held by both sides
    /// with different values is settled by the duplicate policy.
    ///
    /// # Errors
    ///
    /// The first error the duplicate policy raises; no set is returned.
    pub fn symmetric_difference(&mut self, other: &mut Self) -> Result<Self>
    where
        K::Key: fmt::Debug,
    {
        let left_only = self.list.difference([&mut other.list]);
        let mut result = self.derive(left_only);
        result.merge(other.list.to_vec())?;
        Ok(result)
    }

    /// In-place form of [`SortedKeyedSet::symmetric_difference`]; returns
    /// how many elements of `other` changed the set.
    ///
    /// # Errors
    ///
    /// Stops at the first error the duplicate policy raises.
    pub fn update_symmetric_difference(&mut self, other: &mut Self) -> Result<usize>
    where
        K::Key: fmt::Debug,
    {
        self.list.update_difference([&mut other.list]);
        self.merge(other.list.to_vec())
    }
}

impl<T: Ord + Clone> SortedKeyedSet<T, Identity> {
    /// Creates an empty value-keyed set with the
    /// [`DuplicatePolicy::KeepNew`] policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_key(Identity)
    }
}

impl<T: Ord + Clone> Default for SortedKeyedSet<T, Identity> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K> Clone for SortedKeyedSet<T, K>
where
    T: Clone,
    K: KeyExtractor<T>,
    K::Key: Clone,
{
    fn clone(&self) -> Self {
        Self {
            list: self.list.clone(),
            policy: self.policy.clone(),
            identity: self.identity,
        }
    }
}

impl<T: fmt::Debug, K: KeyExtractor<T>> fmt::Debug for SortedKeyedSet<T, K> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SortedKeyedSet")
            .field("policy", &self.policy)
            .field("list", &self.list)
            .finish_non_exhaustive()
    }
}

/// A sorted set of distinct values.
///
/// Duplicates are ignored, or rejected when the set was built with
/// [`SortedSet::failing_on_duplicate`].
///
/// # Examples
///
/// ```rust
/// use lazysorted::SortedSet;
///
/// let mut set: SortedSet<i32> = [3, 1, 3, 2, 1].into_iter().collect();
/// assert_eq!(set.to_vec(), vec![1, 2, 3]);
/// assert_eq!(set.add(2), Ok(false));
/// ```
#[derive(Debug, Clone)]
pub struct SortedSet<T: Ord + Clone> {
    inner: SortedKeyedSet<T, Identity>,
}

impl<T: Ord + Clone> SortedSet<T> {
    /// Creates an empty set that ignores duplicates.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: SortedKeyedSet::with_key(Identity).with_policy(DuplicatePolicy::KeepOld),
        }
    }

    /// Creates an empty set that rejects duplicates with
    /// [`SortedListError::DuplicateKeyViolation`].
    #[must_use]
    pub fn failing_on_duplicate() -> Self {
        Self {
            inner: SortedKeyedSet::with_key(Identity).with_policy(DuplicatePolicy::Fail),
        }
    }

    /// Returns `true` if duplicates are rejected rather than ignored.
    #[inline]
    #[must_use]
    pub fn fails_on_duplicate(&self) -> bool {
        *self.inner.policy() == DuplicatePolicy::Fail
    }

    /// Adds `item`; `Ok(false)` means it was already present.
    ///
    /// # Errors
    ///
    /// [`SortedListError::DuplicateKeyViolation`] for a duplicate when the
    /// set fails on duplicates.
    pub fn add(&mut self, item: T) -> Result<bool>
    where
        T: fmt::Debug,
    {
        self.inner.add(item)
    }

    /// Adds every item; returns how many were new.
    ///
    /// # Errors
    ///
    /// Same as [`SortedSet::add`]; stops at the first error.
    pub fn merge<I>(&mut self, items: I) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
        T: fmt::Debug,
    {
        self.inner.merge(items)
    }

    /// Returns `true` if `item` is present.
    pub fn contains(&mut self, item: &T) -> bool {
        self.inner.contains_key(item)
    }

    /// Removes `item`.
    ///
    /// # Errors
    ///
    /// [`SortedListError::NotFound`] if it is absent.
    pub fn remove(&mut self, item: &T) -> Result<T> {
        self.inner.remove(item)
    }

    /// Removes `item` if present.
    pub fn discard(&mut self, item: &T) -> Option<T> {
        self.inner.remove_key(item)
    }

    /// Removes and returns the largest value.
    ///
    /// # Errors
    ///
    /// [`SortedListError::NotFound`] when the set is empty.
    pub fn pop(&mut self) -> Result<T> {
        self.inner.pop_at(-1)
    }

    /// A new set with the values within `bounds`.
    pub fn slice<B: RangeBounds<T>>(&mut self, bounds: B) -> Self {
        Self {
            inner: self.inner.slice(bounds),
        }
    }

    /// Number of values.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the set is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// See [`SortedList::view`].
    pub fn view(&mut self) -> SortedView<'_, T, Identity> {
        self.inner.view()
    }

    /// Iterates in ascending order.
    pub fn iter(&mut self) -> std::slice::Iter<'_, T> {
        self.inner.iter()
    }

    /// The values in ascending order.
    pub fn to_vec(&mut self) -> Vec<T> {
        self.inner.to_vec()
    }

    /// Removes every value; returns how many there were.
    pub fn clear(&mut self) -> usize {
        self.inner.clear()
    }

    /// A new set with every value of `self` and of each operand.
    ///
    /// # Errors
    ///
    /// [`SortedListError::DuplicateKeyViolation`] for a shared value when
    /// the set fails on duplicates.
    pub fn union<'a, I>(&mut self, others: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a mut Self>,
        T: fmt::Debug + 'a,
    {
        let inner = self.inner.union(others.into_iter().map(|other| &mut other.inner))?;
        Ok(Self { inner })
    }

    /// Adds every value of each operand; returns how many were new.
    ///
    /// # Errors
    ///
    /// Same as [`SortedSet::union`]; values added before the error stay.
    pub fn update_union<'a, I>(&mut self, others: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a mut Self>,
        T: fmt::Debug + 'a,
    {
        self.inner
            .update_union(others.into_iter().map(|other| &mut other.inner))
    }

    /// A new set with the values present in `self` and every operand.
    pub fn intersection<'a, I>(&mut self, others: I) -> Self
    where
        I: IntoIterator<Item = &'a mut Self>,
        T: 'a,
    {
        Self {
            inner: self
                .inner
                .intersection(others.into_iter().map(|other| &mut other.inner)),
        }
    }

    /// Keeps the values present in every operand.
    pub fn update_intersection<'a, I>(&mut self, others: I)
    where
        I: IntoIterator<Item = &'a mut Self>,
        T: 'a,
    {
        self.inner
            .update_intersection(others.into_iter().map(|other| &mut other.inner));
    }

    /// A new set with the values of `self` absent from every operand.
    pub fn difference<'a, I>(&mut self, others: I) -> Self
    where
        I: IntoIterator<Item = &'a mut Self>,
        T: 'a,
    {
        Self {
            inner: self
                .inner
                .difference(others.into_iter().map(|other| &mut other.inner)),
        }
    }

    /// Removes the values present in any operand.
    pub fn update_difference<'a, I>(&mut self, others: I)
    where
        I: IntoIterator<Item = &'a mut Self>,
        T: 'a,
    {
        self.inner
            .update_difference(others.into_iter().map(|other| &mut other.inner));
    }

    /// A new set with every value of either side.
    ///
    /// # Errors
    ///
    /// Never fails in practice: shared values are removed from `self` before
    /// `other` is added.
    pub fn symmetric_difference(&mut self, other: &mut Self) -> Result<Self>
    where
        T: fmt::Debug,
    {
        let inner = self.inner.symmetric_difference(&mut other.inner)?;
        Ok(Self { inner })
    }

    /// In-place form of [`SortedSet::symmetric_difference`].
    ///
    /// # Errors
    ///
    /// Same as [`SortedSet::symmetric_difference`].
    pub fn update_symmetric_difference(&mut self, other: &mut Self) -> Result<usize>
    where
        T: fmt::Debug,
    {
        self.inner.update_symmetric_difference(&mut other.inner)
    }

    /// Unwraps the underlying list.
    #[must_use]
    pub fn into_list(self) -> SortedList<T> {
        self.inner.into_list()
    }
}

impl<T: Ord + Clone> Default for SortedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone> FromIterator<T> for SortedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut elements: Vec<T> = iter.into_iter().collect();
        elements.sort();
        elements.dedup();
        let mut set = Self::new();
        set.inner.list.replace_sorted(elements);
        set
    }
}
