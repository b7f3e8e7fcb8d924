//! # lazysorted
//!
//! Ordered multiset containers that postpone sorting until the order is
//! actually observed.
//!
//! ## Overview
//!
//! A [`SortedList`] keeps its elements in a flat vector. Elements that extend
//! the current key range are placed at the front or back right away; all
//! others are appended to an unsorted tail. The tail is merged by a single
//! stable sort once a [`ThresholdPolicy`] says it has grown large enough, or
//! as soon as anything reads the container. On top of that core the crate
//! provides:
//!
//! - **Range finding**: binary searches over duplicate keys through
//!   [`SortedView`]
//! - **Multiset algebra**: union, intersection, difference and symmetric
//!   difference by value count
//! - **Vetted containers**: [`CheckedSortedList`] and [`TypedSortedList`]
//! - **Keyed sets**: [`SortedKeyedSet`] with a [`DuplicatePolicy`], and
//!   [`SortedSet`]
//!
//! ## Feature Flags
//!
//! - `checked`: vetted and typed containers
//! - `keyed`: keyed sets and duplicate policies
//! - `full`: enable all features
//!
//! ## Example
//!
//! ```rust
//! use lazysorted::prelude::*;
//!
//! let mut scores = SortedList::with_key(|entry: &(&str, u32)| entry.1);
//! scores.merge([("ann", 72), ("bob", 91), ("cyd", 85), ("dee", 85)]);
//!
//! assert_eq!(scores.find_key_range(&85), 1..3);
//! assert_eq!(scores.last(), Some(&("bob", 91)));
//! ```
//!
//! ## Diagnostics
//!
//! Resorts are traced at `TRACE` level and every returned error is first
//! passed to the container's [`ErrorSink`]; the default [`TracingSink`]
//! emits it at `DEBUG` level. The crate never installs a subscriber.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports the containers, their configuration types and the traits
/// needed to call them.
///
/// # Usage
///
/// ```rust
/// use lazysorted::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ErrorSink, Result, SilentSink, SortedListError, TracingSink};
    pub use crate::key::{Identity, KeyExtractor, SameIdentity};
    pub use crate::sorted::{SortedList, SortedView};
    pub use crate::threshold::ThresholdPolicy;

    #[cfg(feature = "checked")]
    pub use crate::sorted::{CheckedSortedList, Convert, TypedSortedList, Vetter};

    #[cfg(feature = "keyed")]
    pub use crate::sorted::{DuplicatePolicy, SortedKeyedSet, SortedSet};
}

pub mod error;
pub mod key;
pub mod sorted;
pub mod threshold;

pub use error::{ErrorSink, Result, SilentSink, SortedListError, TracingSink};
pub use key::{Identity, KeyExtractor, SameIdentity};
#[cfg(feature = "checked")]
pub use sorted::{CheckedSortedList, Convert, TypedSortedList, Vetter};
#[cfg(feature = "keyed")]
pub use sorted::{DuplicatePolicy, SortedKeyedSet, SortedSet};
pub use sorted::{DistinctItems, KeyCounts, Keys, SortedList, SortedView};
pub use threshold::ThresholdPolicy;
