//! Error types for the diff crate.
//!
//! The only error category is caller misuse of the list differ; value-level
//! surprises (type mismatches, missing keys on one side) are diff results,
//! never errors.

use std::fmt;

/// Which input list an element came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListSide {
    /// The baseline list.
    Old,
    /// The desired-state list.
    New,
}

impl fmt::Display for ListSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListSide::Old => write!(f, "old"),
            ListSide::New => write!(f, "new"),
        }
    }
}

/// Errors that can occur when building a correlated list diff.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// An element of one of the input lists lacks the correlation key.
    #[error(
        "correlation key {key:?} missing from {side} list element at index {index} \
         (available keys: {available:?})"
    )]
    MissingCorrelationKey {
        key: String,
        side: ListSide,
        index: usize,
        available: Vec<String>,
    },

    /// The correlation key's value occurs more than once within one list,
    /// so elements cannot be matched unambiguously.
    #[error("correlation key {key:?} has duplicate value {value} in the {side} list")]
    DuplicateCorrelationKey {
        key: String,
        side: ListSide,
        value: String,
    },
}

/// Convenience alias for diff results.
pub type Result<T> = std::result::Result<T, DiffError>;
