//! Error types and the pluggable error sink.
//!
//! Every failure a container detects is described by a [`SortedListError`].
//! Before the error is handed back to the caller as `Err`, it is passed to the
//! container's [`ErrorSink`], so applications can route failures to whatever
//! diagnostics backend they use without the container depending on it.
//!
//! # Examples
//!
//! ```rust
//! use lazysorted::{SortedList, SortedListError};
//!
//! let mut list: SortedList<i32> = [1, 2, 3].into_iter().collect();
//! let error = list.remove(&42).unwrap_err();
//! assert!(matches!(error, SortedListError::NotFound { .. }));
//! ```

use thiserror::Error;

/// Errors signaled by the containers in this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SortedListError {
    /// A threshold fraction outside `[0, 1]` was supplied.
    #[error("threshold fraction {fraction} is illegal: it must be between 0 and 1")]
    InvalidThreshold {
        /// The rejected fraction.
        fraction: f64,
    },

    /// The target of a removal or pop was absent.
    #[error("{operation}: no matching element")]
    NotFound {
        /// The operation that failed.
        operation: &'static str,
    },

    /// A positional access fell outside `[-len, len)`.
    #[error("index {index} is out of range for a container of length {len}")]
    IndexOutOfRange {
        /// The requested index.
        index: isize,
        /// The container length at the time of the access.
        len: usize,
    },

    /// A write would have changed an order that is derived from the keys.
    #[error("{operation}: positional order is derived from the keys and cannot be written")]
    ReadOnlyViolation {
        /// The operation that was refused.
        operation: &'static str,
    },

    /// A vetting function rejected its input.
    #[error("{found} was pushed, but {expected} is expected")]
    TypeMismatch {
        /// The element type the container holds.
        expected: &'static str,
        /// The type that was offered.
        found: &'static str,
    },

    /// A keyed set refused an element because of its duplicate-key policy.
    #[error("duplicate item with key {key} violates the duplicate policy")]
    DuplicateKeyViolation {
        /// Debug rendering of the offending key.
        key: String,
    },

    /// An unrecognized duplicate-policy tag was supplied.
    #[error("unexpected duplicate policy tag '{tag}'")]
    ConfigurationError {
        /// The rejected tag.
        tag: String,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SortedListError>;

/// Receives every error a container signals, right before it is returned.
///
/// Implementations must not panic; the error is still returned to the caller
/// after `report` finishes.
pub trait ErrorSink {
    /// Observes a failure.
    fn report(&self, error: &SortedListError);
}

/// Emits each error as a `tracing` event at `DEBUG` level.
///
/// This is the default sink of every container.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn report(&self, error: &SortedListError) {
        tracing::debug!(%error, "sorted container operation failed");
    }
}

/// Drops every error without observing it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSink;

impl ErrorSink for SilentSink {
    fn report(&self, _error: &SortedListError) {}
}

impl<F> ErrorSink for F
where
    F: Fn(&SortedListError),
{
    fn report(&self, error: &SortedListError) {
        self(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::RefCell;

    #[rstest]
    #[case(SortedListError::InvalidThreshold { fraction: 1.5 },
        "threshold fraction 1.5 is illegal: it must be between 0 and 1")]
    #[case(SortedListError::NotFound { operation: "remove" }, "remove: no matching element")]
    #[case(SortedListError::IndexOutOfRange { index: -4, len: 3 },
        "index -4 is out of range for a container of length 3")]
    #[case(SortedListError::TypeMismatch { expected: "i64", found: "u64" },
        "u64 was pushed, but i64 is expected")]
    #[case(SortedListError::ConfigurationError { tag: "zzz".to_string() },
        "unexpected duplicate policy tag 'zzz'")]
    fn test_error_display(#[case] error: SortedListError, #[case] expected: &str) {
        assert_eq!(format!("{error}"), expected);
    }

    #[rstest]
    fn test_closure_sink_observes_error() {
        let seen = RefCell::new(Vec::new());
        let sink = |error: &SortedListError| seen.borrow_mut().push(error.clone());
        sink.report(&SortedListError::NotFound { operation: "pop" });
        assert_eq!(
            seen.into_inner(),
            vec![SortedListError::NotFound { operation: "pop" }]
        );
    }

    #[rstest]
    fn test_builtin_sinks_do_not_panic() {
        let error = SortedListError::ReadOnlyViolation { operation: "replace_at" };
        TracingSink.report(&error);
        SilentSink.report(&error);
    }
}
