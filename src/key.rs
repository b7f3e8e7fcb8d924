//! Key extraction and identity matching.
//!
//! A container orders its elements by the key a [`KeyExtractor`] derives from
//! each of them. Any closure `Fn(&T) -> Q` with `Q: Ord` is a key extractor;
//! [`Identity`] orders elements by themselves.
//!
//! # Examples
//!
//! ```rust
//! use lazysorted::SortedList;
//!
//! let mut words = SortedList::with_key(|word: &&str| word.len());
//! words.add("ccc");
//! words.add("a");
//! words.add("bb");
//! assert_eq!(words.to_vec(), vec!["a", "bb", "ccc"]);
//! ```

use std::rc::Rc;
use std::sync::Arc;

/// Derives the sort key of an element.
///
/// Implementations must be pure: the key of an element must not change while
/// the element is stored in a container.
pub trait KeyExtractor<T: ?Sized> {
    /// The totally ordered key type.
    type Key: Ord;

    /// Returns the key of `item`.
    fn key(&self, item: &T) -> Self::Key;
}

/// Orders elements by their own value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl<T: Ord + Clone> KeyExtractor<T> for Identity {
    type Key = T;

    #[inline]
    fn key(&self, item: &T) -> T {
        item.clone()
    }
}

impl<T: ?Sized, Q: Ord, F> KeyExtractor<T> for F
where
    F: Fn(&T) -> Q,
{
    type Key = Q;

    #[inline]
    fn key(&self, item: &T) -> Q {
        self(item)
    }
}

/// Object identity, as opposed to value equality.
///
/// Owned values moved into a container have no identity beyond their value,
/// so this is implemented for the shared-pointer and reference types where
/// "the same object" is meaningful.
pub trait SameIdentity {
    /// Returns `true` when `self` and `other` denote the same object.
    fn same_identity(&self, other: &Self) -> bool;
}

impl<U: ?Sized> SameIdentity for Rc<U> {
    #[inline]
    fn same_identity(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<U: ?Sized> SameIdentity for Arc<U> {
    #[inline]
    fn same_identity(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<U: ?Sized> SameIdentity for &U {
    #[inline]
    fn same_identity(&self, other: &Self) -> bool {
        std::ptr::eq(*self, *other)
    }
}
