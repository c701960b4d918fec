//! Structural diff engine for state convergence.
//!
//! Compares a "current state" structure against a "desired state" structure
//! and produces the delta a configuration-management caller turns into its
//! changes report. Pure, synchronous, in-memory computation over
//! already-fetched data; no I/O, no logging, no shared state.
//!
//! # Key Types
//!
//! - [`FlatDiff`] / [`diff_flat`] -- Flat mapping diff (added/removed/changed/unchanged key sets)
//! - [`RecursiveDiff`] / [`diff_recursive`] -- Nested mapping diff with dotted-path views
//! - [`DeepDiff`] / [`deep_diff`] -- Per-side pruned diff of two mappings
//! - [`CorrelatedListDiff`] -- Key-correlated diff of two lists of mappings

pub mod deep;
pub mod error;
pub mod flat;
pub mod list;
pub mod recursive;
pub mod value;

pub use deep::{deep_diff, DeepDiff};
pub use error::{DiffError, ListSide, Result};
pub use flat::{diff_flat, FlatDiff};
pub use list::{CorrelatedListDiff, ElementDiff, MatchedPair, Partition, Selection};
pub use recursive::{diff_recursive, DiffNode, DiffOptions, IgnoreScope, RecursiveDiff};
pub use value::StateMap;
