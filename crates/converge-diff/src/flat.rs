//! Flat mapping diff: partition keys into added/removed/changed/unchanged.
//!
//! The leaf building block of the engine. No recursion: values are compared
//! by equality whatever their type, so a nested object that differs anywhere
//! inside counts as a single changed key. Argument order is fixed
//! project-wide: `old` (baseline) first, `new` (desired) second.

use std::collections::BTreeSet;

use crate::value::StateMap;

/// The result of comparing two flat mappings.
///
/// The four sets are pairwise disjoint and together cover every key of
/// either input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlatDiff {
    /// Keys present only in `new`.
    pub added: BTreeSet<String>,
    /// Keys present only in `old`.
    pub removed: BTreeSet<String>,
    /// Keys present in both with unequal values.
    pub changed: BTreeSet<String>,
    /// Keys present in both with equal values.
    pub unchanged: BTreeSet<String>,
}

impl FlatDiff {
    /// Create an empty flat diff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the two mappings are equal (nothing added, removed,
    /// or changed).
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    /// Total number of keys across all four partitions.
    pub fn total_keys(&self) -> usize {
        self.added.len() + self.removed.len() + self.changed.len() + self.unchanged.len()
    }
}

/// Compute the diff between two flat mappings.
///
/// Keys present only in `new` are added, keys present only in `old` are
/// removed, keys in both are changed or unchanged by value equality.
///
/// # Examples
///
/// ```
/// use converge_diff::{diff_flat, StateMap};
/// use serde_json::json;
///
/// let mut old = StateMap::new();
/// old.insert("a".into(), json!(1));
/// let mut new = StateMap::new();
/// new.insert("a".into(), json!(2));
/// new.insert("b".into(), json!(3));
///
/// let diff = diff_flat(&old, &new);
/// assert!(diff.changed.contains("a"));
/// assert!(diff.added.contains("b"));
/// ```
pub fn diff_flat(old: &StateMap, new: &StateMap) -> FlatDiff {
    let mut diff = FlatDiff::new();

    for (key, old_val) in old {
        match new.get(key) {
            Some(new_val) if old_val == new_val => {
                diff.unchanged.insert(key.clone());
            }
            Some(_) => {
                diff.changed.insert(key.clone());
            }
            None => {
                diff.removed.insert(key.clone());
            }
        }
    }

    for key in new.keys() {
        if !old.contains_key(key) {
            diff.added.insert(key.clone());
        }
    }

    diff
}
