//! The rule deciding when pending elements are merged automatically.
//!
//! A [`ThresholdPolicy`] bounds the work of a resort both relative to the
//! current size (`fraction`) and absolutely (`absolute`). Requiring both keeps
//! tiny containers from resorting on every interior insert and keeps large
//! containers from growing an unbounded pending tail.
//!
//! # Examples
//!
//! ```rust
//! use lazysorted::ThresholdPolicy;
//!
//! let policy = ThresholdPolicy::new(2.0 / 3.0, 2).unwrap();
//! assert!(!policy.is_met(2, 1));
//! assert!(policy.is_met(2, 2));
//! ```

use crate::error::{Result, SortedListError};
use std::fmt;

/// Default fraction of the sorted prefix the pending tail must reach.
pub const DEFAULT_FRACTION: f64 = 0.5;

/// Default minimum number of pending elements before a resort.
pub const DEFAULT_ABSOLUTE: usize = 64 * 1024;

/// Stateless decision object: resort once enough elements are pending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPolicy {
    fraction: f64,
    absolute: usize,
}

impl ThresholdPolicy {
    /// Resorts after every interior insert.
    pub const EAGER: Self = Self {
        fraction: 0.0,
        absolute: 0,
    };

    /// Creates a policy.
    ///
    /// # Errors
    ///
    /// Returns [`SortedListError::InvalidThreshold`] when `fraction` is not
    /// within `[0, 1]` (including NaN).
    pub fn new(fraction: f64, absolute: usize) -> Result<Self> {
        if (0.0..=1.0).contains(&fraction) {
            Ok(Self { fraction, absolute })
        } else {
            Err(SortedListError::InvalidThreshold { fraction })
        }
    }

    /// Returns a copy with a different fraction.
    ///
    /// # Errors
    ///
    /// Same as [`ThresholdPolicy::new`].
    pub fn with_fraction(self, fraction: f64) -> Result<Self> {
        Self::new(fraction, self.absolute)
    }

    /// Returns a copy with a different absolute floor.
    #[must_use]
    pub const fn with_absolute(self, absolute: usize) -> Self {
        Self {
            fraction: self.fraction,
            absolute,
        }
    }

    /// The relative part of the rule.
    #[inline]
    #[must_use]
    pub const fn fraction(&self) -> f64 {
        self.fraction
    }

    /// The absolute floor of the rule.
    #[inline]
    #[must_use]
    pub const fn absolute(&self) -> usize {
        self.absolute
    }

    /// Returns `true` when `pending_count` elements waiting behind
    /// `sorted_count` sorted ones should be merged now.
    #[allow(clippy::cast_precision_loss)]
    #[inline]
    #[must_use]
    pub fn is_met(&self, sorted_count: usize, pending_count: usize) -> bool {
        pending_count as f64 >= sorted_count as f64 * self.fraction
            && pending_count >= self.absolute
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            fraction: DEFAULT_FRACTION,
            absolute: DEFAULT_ABSOLUTE,
        }
    }
}

impl fmt::Display for ThresholdPolicy {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "ThresholdPolicy({:.3}, {})",
            self.fraction, self.absolute
        )
    }
}
