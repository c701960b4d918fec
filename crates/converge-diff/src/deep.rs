//! A slim two-sided diff: the differing parts of each input, shape intact.
//!
//! Where [`crate::recursive`] produces a path-addressable tree with
//! `{old, new}` leaves, `deep_diff` answers the simpler question "what does
//! each side look like where they disagree". Both results are plain
//! mappings, safe to serialize straight into a changes report.
//!
//! Inputs are read-only; the result is built directly rather than by
//! draining working copies.

use serde_json::Value;

use crate::value::StateMap;

/// The differing parts of two mappings, one pruned mapping per side.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeepDiff {
    /// The old side's values at every differing location. Empty when no key
    /// of the old side differs.
    pub old: StateMap,
    /// The new side's values at every differing location.
    pub new: StateMap,
}

impl DeepDiff {
    /// Returns `true` if the two mappings are equal.
    pub fn is_empty(&self) -> bool {
        self.old.is_empty() && self.new.is_empty()
    }
}

/// Compute the pruned per-side diff of two mappings.
///
/// Keys listed in `ignore` are skipped at every nesting level. A nested
/// object pair contributes only if its own pruned diff is non-empty; keys
/// equal on both sides never appear.
///
/// # Examples
///
/// ```
/// use converge_diff::{deep_diff, StateMap};
/// use serde_json::json;
///
/// let mut old = StateMap::new();
/// old.insert("port".into(), json!(80));
/// let mut new = StateMap::new();
/// new.insert("port".into(), json!(443));
///
/// let diff = deep_diff(&old, &new, &[]);
/// assert_eq!(diff.old.get("port"), Some(&json!(80)));
/// assert_eq!(diff.new.get("port"), Some(&json!(443)));
/// ```
pub fn deep_diff(old: &StateMap, new: &StateMap, ignore: &[&str]) -> DeepDiff {
    let mut diff = DeepDiff::default();

    for (key, old_val) in old {
        if ignore.contains(&key.as_str()) {
            continue;
        }
        match new.get(key) {
            Some(new_val) if old_val == new_val => {}
            Some(Value::Object(new_sub)) => {
                if let Value::Object(old_sub) = old_val {
                    let sub = deep_diff(old_sub, new_sub, ignore);
                    if !sub.is_empty() {
                        diff.old.insert(key.clone(), Value::Object(sub.old));
                        diff.new.insert(key.clone(), Value::Object(sub.new));
                    }
                } else {
                    diff.old.insert(key.clone(), old_val.clone());
                    diff.new.insert(key.clone(), Value::Object(new_sub.clone()));
                }
            }
            Some(new_val) => {
                diff.old.insert(key.clone(), old_val.clone());
                diff.new.insert(key.clone(), new_val.clone());
            }
            None => {
                diff.old.insert(key.clone(), old_val.clone());
            }
        }
    }

    for (key, new_val) in new {
        if ignore.contains(&key.as_str()) {
            continue;
        }
        if !old.contains_key(key) {
            diff.new.insert(key.clone(), new_val.clone());
        }
    }

    diff
}
