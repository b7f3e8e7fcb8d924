//! Lazily sorted containers.
//!
//! This module provides the containers of the crate:
//!
//! - [`SortedList`]: a multiset that defers sorting work until it is read
//! - [`SortedView`]: the borrowed, fully sorted face of a [`SortedList`]
//! - [`CheckedSortedList`] / [`TypedSortedList`]: containers that vet or
//!   convert every input
//! - [`SortedKeyedSet`] / [`SortedSet`]: containers holding one element per key
//!
//! # Deferred Sorting
//!
//! Elements landing at either end of the key range are placed immediately.
//! Everything else waits in an unsorted tail until the configured
//! [`ThresholdPolicy`](crate::ThresholdPolicy) is met or a read needs the
//! full order, at which point the whole container is stable-sorted once.
//! Workloads that mostly append in key order therefore never pay for a sort.
//!
//! # Examples
//!
//! ```rust
//! use lazysorted::SortedList;
//!
//! let mut list: SortedList<i32> = SortedList::new();
//! list.merge([10, 20, 30, 15, 25]);
//!
//! let view = list.view();
//! assert_eq!(view.as_slice(), &[10, 15, 20, 25, 30]);
//! assert_eq!(view.find_slice_range(15..=25), 1..4);
//! ```

mod algebra;
#[cfg(feature = "checked")]
mod checked;
mod iter;
#[cfg(feature = "keyed")]
mod keyed;
mod list;
mod range;

#[cfg(feature = "checked")]
pub use checked::{CheckedSortedList, Convert, TypedSortedList, Vetter};
pub use iter::{DistinctItems, KeyCounts, Keys};
#[cfg(feature = "keyed")]
pub use keyed::{DuplicatePolicy, SortedKeyedSet, SortedSet};
pub use list::SortedList;
pub use range::SortedView;
