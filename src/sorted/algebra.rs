//! Multiset algebra between containers sharing a key extractor.
//!
//! All operations count copies by value equality inside each key group, so
//! two elements with the same key but different values are distinct members.
//! Every operand is resorted first; the sorted slices are then combined with
//! a two-pointer scan that jumps from one key group to the next with binary
//! searches.
//!
//! | Operation              | Copies of a value kept (`a` in self, `b` in other) |
//! |------------------------|----------------------------------------------------|
//! | `union`                | `a + b`                                            |
//! | `intersection`         | `min(a, b)`                                        |
//! | `difference`           | `a - min(a, b)`                                    |
//! | `symmetric_difference` | `a + b - min(a, b)`                                |
//!
//! The key extractor of `self` is used for every operand. An operand whose
//! own extractor orders it differently is re-sorted by `self`'s key first.
//!
//! # Examples
//!
//! ```rust
//! use lazysorted::SortedList;
//!
//! let mut left: SortedList<i32> = [1, 2, 2, 3].into_iter().collect();
//! let mut right: SortedList<i32> = [2, 3, 3, 4].into_iter().collect();
//!
//! assert_eq!(left.intersection([&mut right]).to_vec(), vec![2, 3]);
//! assert_eq!(left.difference([&mut right]).to_vec(), vec![1, 2]);
//! assert_eq!(left.union([&mut right]).len(), 8);
//! ```

use super::SortedList;
use super::iter::GROUP_INLINE;
use super::range::key_group_end;
use crate::key::KeyExtractor;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::cmp::Ordering;

impl<T, K> SortedList<T, K>
where
    T: Clone + PartialEq,
    K: KeyExtractor<T>,
{
    /// Folds `others` into the sorted elements of `self` with `step`.
    fn combine<'a, I, F>(&mut self, others: I, step: F) -> Vec<T>
    where
        I: IntoIterator<Item = &'a mut Self>,
        F: Fn(&[T], &[T], &K) -> Vec<T>,
        T: 'a,
        K: 'a,
    {
        self.restore_sorted_order();
        let mut accumulated: Option<Vec<T>> = None;
        for other in others {
            let operand = self.ordered_operand(other);
            let left = accumulated.as_deref().unwrap_or_else(|| self.raw_slice());
            let combined = step(left, &operand, self.key_extractor());
            accumulated = Some(combined);
        }
        accumulated.unwrap_or_else(|| self.raw_slice().to_vec())
    }

    /// The elements of `other`, sorted by the key of `self`.
    fn ordered_operand<'b>(&self, other: &'b mut Self) -> Cow<'b, [T]> {
        other.restore_sorted_order();
        let other: &'b Self = other;
        let items = other.raw_slice();
        if self.shares_key_with(other) || items.is_sorted_by_key(|item| self.key_of(item)) {
            Cow::Borrowed(items)
        } else {
            let mut reordered = items.to_vec();
            reordered.sort_by_cached_key(|item| self.key_of(item));
            Cow::Owned(reordered)
        }
    }

    /// A new container with every element of `self` and of each operand.
    pub fn union<'a, I>(&mut self, others: I) -> Self
    where
        I: IntoIterator<Item = &'a mut Self>,
        T: 'a,
        K: 'a,
    {
        let elements = self.combine(others, merge_sorted);
        self.derive_sorted(elements)
    }

    /// Adds every element of each operand to `self`.
    pub fn update_union<'a, I>(&mut self, others: I)
    where
        I: IntoIterator<Item = &'a mut Self>,
        T: 'a,
        K: 'a,
    {
        let elements = self.combine(others, merge_sorted);
        self.replace_sorted(elements);
    }

    /// A new container keeping, per value, the copies common to `self` and
    /// every operand.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazysorted::SortedList;
    ///
    /// let mut a: SortedList<i32> = [1, 1, 1, 2].into_iter().collect();
    /// let mut b: SortedList<i32> = [1, 1, 2, 2].into_iter().collect();
    /// let mut c: SortedList<i32> = [1, 2, 2].into_iter().collect();
    /// assert_eq!(a.intersection([&mut b, &mut c]).to_vec(), vec![1, 2]);
    /// ```
    pub fn intersection<'a, I>(&mut self, others: I) -> Self
    where
        I: IntoIterator<Item = &'a mut Self>,
        T: 'a,
        K: 'a,
    {
        let elements = self.combine(others, intersect_sorted);
        self.derive_sorted(elements)
    }

    /// Keeps in `self` only the copies common to every operand.
    pub fn update_intersection<'a, I>(&mut self, others: I)
    where
        I: IntoIterator<Item = &'a mut Self>,
        T: 'a,
        K: 'a,
    {
        let elements = self.combine(others, intersect_sorted);
        self.replace_sorted(elements);
    }

    /// A new container holding `self` minus, per value, the copies found in
    /// each operand.
    pub fn difference<'a, I>(&mut self, others: I) -> Self
    where
        I: IntoIterator<Item = &'a mut Self>,
        T: 'a,
        K: 'a,
    {
        let elements = self.combine(others, difference_sorted);
        self.derive_sorted(elements)
    }

    /// Removes from `self`, per value, the copies found in each operand.
    pub fn update_difference<'a, I>(&mut self, others: I)
    where
        I: IntoIterator<Item = &'a mut Self>,
        T: 'a,
        K: 'a,
    {
        let elements = self.combine(others, difference_sorted);
        self.replace_sorted(elements);
    }

    fn symmetric_elements(&mut self, other: &mut Self) -> Vec<T> {
        self.restore_sorted_order();
        let operand = self.ordered_operand(other);
        let key = self.key_extractor();
        // (a - min(a, b)) + b == a + b - min(a, b)
        let left_only = difference_sorted(self.raw_slice(), &operand, key);
        merge_sorted(&left_only, &operand, key)
    }

    /// A new container holding `a + b - min(a, b)` copies of each value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazysorted::SortedList;
    ///
    /// let mut a: SortedList<i32> = [1, 2, 2].into_iter().collect();
    /// let mut b: SortedList<i32> = [2, 3].into_iter().collect();
    /// assert_eq!(a.symmetric_difference(&mut b).to_vec(), vec![1, 2, 2, 3]);
    /// ```
    pub fn symmetric_difference(&mut self, other: &mut Self) -> Self {
        let elements = self.symmetric_elements(other);
        self.derive_sorted(elements)
    }

    /// In-place form of [`SortedList::symmetric_difference`].
    pub fn update_symmetric_difference(&mut self, other: &mut Self) {
        let elements = self.symmetric_elements(other);
        self.replace_sorted(elements);
    }
}

/// Returns `true` when the key spans of `left` and `right` cannot overlap.
fn disjoint<T, K: KeyExtractor<T>>(left: &[T], right: &[T], key: &K) -> bool {
    match (left.first(), left.last(), right.first(), right.last()) {
        (Some(left_first), Some(left_last), Some(right_first), Some(right_last)) => {
            key.key(left_last) < key.key(right_first) || key.key(right_last) < key.key(left_first)
        }
        _ => true,
    }
}

/// Stable merge of two sorted slices; on equal keys `left` comes first.
fn merge_sorted<T: Clone, K: KeyExtractor<T>>(left: &[T], right: &[T], key: &K) -> Vec<T> {
    let mut result = Vec::with_capacity(left.len() + right.len());
    if let (Some(left_last), Some(right_first)) = (left.last(), right.first())
        && key.key(left_last) <= key.key(right_first)
    {
        result.extend_from_slice(left);
        result.extend_from_slice(right);
        return result;
    }

    let mut left_index = 0;
    let mut right_index = 0;
    while left_index < left.len() && right_index < right.len() {
        if key.key(&right[right_index]) < key.key(&left[left_index]) {
            result.push(right[right_index].clone());
            right_index += 1;
        } else {
            result.push(left[left_index].clone());
            left_index += 1;
        }
    }
    result.extend_from_slice(&left[left_index..]);
    result.extend_from_slice(&right[right_index..]);
    result
}

fn intersect_sorted<T, K>(left: &[T], right: &[T], key: &K) -> Vec<T>
where
    T: Clone + PartialEq,
    K: KeyExtractor<T>,
{
    if disjoint(left, right, key) {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(left.len().min(right.len()));
    let mut left_index = 0;
    let mut right_index = 0;
    while left_index < left.len() && right_index < right.len() {
        let left_key = key.key(&left[left_index]);
        let right_key = key.key(&right[right_index]);
        match left_key.cmp(&right_key) {
            Ordering::Less => {
                left_index += left[left_index..].partition_point(|item| key.key(item) < right_key);
            }
            Ordering::Greater => {
                right_index += right[right_index..].partition_point(|item| key.key(item) < left_key);
            }
            Ordering::Equal => {
                let left_end = key_group_end(left, key, left_index);
                let right_end = key_group_end(right, key, right_index);
                let available = &right[right_index..right_end];
                let group_start = result.len();
                for item in &left[left_index..left_end] {
                    let kept = result[group_start..].iter().filter(|entry| *entry == item).count();
                    if kept < available.iter().filter(|other| *other == item).count() {
                        result.push(item.clone());
                    }
                }
                left_index = left_end;
                right_index = right_end;
            }
        }
    }
    result
}

fn difference_sorted<T, K>(left: &[T], right: &[T], key: &K) -> Vec<T>
where
    T: Clone + PartialEq,
    K: KeyExtractor<T>,
{
    if disjoint(left, right, key) {
        return left.to_vec();
    }

    let mut result = Vec::with_capacity(left.len());
    let mut left_index = 0;
    let mut right_index = 0;
    while left_index < left.len() && right_index < right.len() {
        let left_key = key.key(&left[left_index]);
        let right_key = key.key(&right[right_index]);
        match left_key.cmp(&right_key) {
            Ordering::Less => {
                let skipped =
                    left[left_index..].partition_point(|item| key.key(item) < right_key);
                result.extend_from_slice(&left[left_index..left_index + skipped]);
                left_index += skipped;
            }
            Ordering::Greater => {
                right_index += right[right_index..].partition_point(|item| key.key(item) < left_key);
            }
            Ordering::Equal => {
                let left_end = key_group_end(left, key, left_index);
                let right_end = key_group_end(right, key, right_index);
                let available = &right[right_index..right_end];
                let mut removed: SmallVec<[&T; GROUP_INLINE]> = SmallVec::new();
                for item in &left[left_index..left_end] {
                    let taken = removed.iter().filter(|entry| **entry == item).count();
                    if taken < available.iter().filter(|other| *other == item).count() {
                        removed.push(item);
                    } else {
                        result.push(item.clone());
                    }
                }
                left_index = left_end;
                right_index = right_end;
            }
        }
    }
    result.extend_from_slice(&left[left_index..]);
    result
}
