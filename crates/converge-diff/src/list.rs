//! Key-correlated diff of two lists of mappings.
//!
//! Elements are matched across the lists by the value of a caller-chosen
//! correlation key, never by position. Matched pairs, new-only elements,
//! and old-only elements form three partitions fixed at construction; every
//! derived view delegates per element to [`diff_recursive`].
//!
//! The correlation key must be present in every element and unique within
//! each list; both conditions are validated up front.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{DiffError, ListSide, Result};
use crate::recursive::{diff_recursive, DiffNode, DiffOptions, RecursiveDiff};
use crate::value::{render_label, StateMap};

/// A pair of elements matched by correlation-key value.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchedPair {
    /// The shared correlation-key value.
    pub key_value: Value,
    /// The element from the old list.
    pub old: StateMap,
    /// The element from the new list.
    pub new: StateMap,
}

/// One element's diff tree, labeled by its correlation value.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementDiff {
    /// The rendered correlation-key value.
    pub key_value: String,
    /// The element's pruned diff tree.
    pub diff: BTreeMap<String, DiffNode>,
}

/// Which partitions [`CorrelatedListDiff::changed`] spans.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Matched pairs plus added and removed elements; paths touching an
    /// absent side are included.
    All,
    /// Matched pairs only; paths touching an absent side are excluded.
    Intersect,
}

/// Partition targeted by [`CorrelatedListDiff::remove_diff`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Partition {
    /// The matched pairs (field stripped from both sides).
    Intersect,
    /// The old-only elements.
    Removed,
}

/// The result of correlating and diffing two lists of mappings.
#[derive(Clone, Debug)]
pub struct CorrelatedListDiff {
    key: String,
    intersect: Vec<MatchedPair>,
    added: Vec<StateMap>,
    removed: Vec<StateMap>,
}

impl CorrelatedListDiff {
    /// Correlate `old` and `new` by `key` and partition the elements.
    ///
    /// Fails fast if any element lacks the key, or if a key value occurs
    /// more than once within one list.
    pub fn new(old: &[StateMap], new: &[StateMap], key: &str) -> Result<Self> {
        validate_keys(old, ListSide::Old, key)?;
        validate_keys(new, ListSide::New, key)?;

        let mut intersect = Vec::new();
        let mut removed = Vec::new();
        let mut matched = vec![false; new.len()];

        for (index, old_elem) in old.iter().enumerate() {
            let key_value = key_of(old_elem, key, ListSide::Old, index)?;
            match new.iter().position(|n| n.get(key) == Some(key_value)) {
                Some(pos) => {
                    matched[pos] = true;
                    intersect.push(MatchedPair {
                        key_value: key_value.clone(),
                        old: old_elem.clone(),
                        new: new[pos].clone(),
                    });
                }
                None => removed.push(old_elem.clone()),
            }
        }

        let added = new
            .iter()
            .zip(&matched)
            .filter(|(_, was_matched)| !**was_matched)
            .map(|(elem, _)| elem.clone())
            .collect();

        Ok(Self {
            key: key.to_string(),
            intersect,
            added,
            removed,
        })
    }

    /// The correlation key this diff was built with.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Matched pairs, in old-list order.
    pub fn intersect(&self) -> &[MatchedPair] {
        &self.intersect
    }

    /// Elements present only in the new list, in new-list order.
    pub fn added(&self) -> &[StateMap] {
        &self.added
    }

    /// Elements present only in the old list, in old-list order.
    pub fn removed(&self) -> &[StateMap] {
        &self.removed
    }

    /// Returns `true` if nothing was added or removed and no matched pair
    /// differs.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self
                .element_diffs(Selection::Intersect, &DiffOptions::default())
                .iter()
                .all(|(_, diff)| diff.is_empty())
    }

    /// Per-element pruned diff trees for every element that differs, labeled
    /// by correlation value. Spans all three partitions: added elements diff
    /// against an empty mapping, removed elements likewise.
    pub fn diffs(&self) -> Vec<ElementDiff> {
        self.element_diffs(Selection::All, &DiffOptions::default())
            .into_iter()
            .filter(|(_, diff)| !diff.is_empty())
            .map(|(key_value, diff)| ElementDiff {
                key_value: render_label(&key_value),
                diff: diff.diffs().clone(),
            })
            .collect()
    }

    /// The new-side values of every changed field, one mapping per changed
    /// element, with the correlation key re-attached. Removed elements have
    /// no new side and are skipped; added elements appear whole.
    pub fn new_values(&self) -> Vec<StateMap> {
        let opts = DiffOptions::default();
        let mut out = Vec::new();
        for (key_value, diff) in self
            .pair_diffs(&opts)
            .into_iter()
            .chain(self.added_diffs(&opts))
        {
            if diff.is_empty() {
                continue;
            }
            let mut values = diff.new_values();
            values.insert(self.key.clone(), key_value);
            out.push(values);
        }
        out
    }

    /// The old-side counterpart of [`new_values`]: added elements are
    /// skipped, removed elements appear whole.
    ///
    /// [`new_values`]: CorrelatedListDiff::new_values
    pub fn old_values(&self) -> Vec<StateMap> {
        let opts = DiffOptions::default();
        let mut out = Vec::new();
        for (key_value, diff) in self
            .pair_diffs(&opts)
            .into_iter()
            .chain(self.removed_diffs(&opts))
        {
            if diff.is_empty() {
                continue;
            }
            let mut values = diff.old_values();
            values.insert(self.key.clone(), key_value);
            out.push(values);
        }
        out
    }

    /// Changed-field paths as `"<key>.<key_value>.<field>"` strings. The
    /// correlation key itself is never listed.
    pub fn changed(&self, selection: Selection) -> Vec<String> {
        let opts = DiffOptions {
            ignore_unset_values: selection == Selection::Intersect,
            ..Default::default()
        };
        let mut out = Vec::new();
        for (key_value, diff) in self.element_diffs(selection, &opts) {
            let label = render_label(&key_value);
            for change in diff.changed(".") {
                if change != self.key {
                    out.push(format!("{}.{}.{}", self.key, label, change));
                }
            }
        }
        out
    }

    /// Human-readable per-element change blocks: matched pairs with their
    /// indented field changes, then removed and added elements.
    pub fn changes_str(&self) -> String {
        let opts = DiffOptions::default();
        let mut blocks = Vec::new();

        for (key_value, diff) in self.pair_diffs(&opts) {
            if diff.is_empty() {
                continue;
            }
            let changes = diff
                .changes_str()
                .lines()
                .map(|line| format!("  {line}"))
                .collect::<Vec<_>>()
                .join("\n");
            blocks.push(format!(
                "identified by {} {}:\n{}",
                self.key,
                render_label(&key_value),
                changes
            ));
        }
        for elem in &self.removed {
            blocks.push(format!(
                "identified by {} {}:\n  will be removed",
                self.key,
                self.label_of(elem)
            ));
        }
        for elem in &self.added {
            blocks.push(format!(
                "identified by {} {}:\n  will be added",
                self.key,
                self.label_of(elem)
            ));
        }

        blocks.join("\n")
    }

    /// Dense one-block-per-element rendering:
    /// `<key>=<value> (updated|removed|added): ...`.
    pub fn changes_str2(&self) -> String {
        let opts = DiffOptions::default();
        let mut lines = Vec::new();

        for (key_value, diff) in self.pair_diffs(&opts) {
            if diff.is_empty() {
                continue;
            }
            let changes = diff.changes_str().lines().collect::<Vec<_>>().join(", ");
            lines.push(format!(
                "{}={} (updated): {}",
                self.key,
                render_label(&key_value),
                changes
            ));
        }
        for elem in &self.removed {
            lines.push(format!("{}={} (removed)", self.key, self.label_of(elem)));
        }
        for elem in &self.added {
            lines.push(format!(
                "{}={} (added): {}",
                self.key,
                self.label_of(elem),
                Value::Object(elem.clone())
            ));
        }

        lines.join("\n")
    }

    /// Strip `field` from the stored elements of one partition so later
    /// derivations ignore it. The sole mutator on this type; used to drop
    /// volatile fields (timestamps, counters) from comparison.
    pub fn remove_diff(&mut self, field: &str, partition: Partition) {
        match partition {
            Partition::Intersect => {
                for pair in &mut self.intersect {
                    pair.old.remove(field);
                    pair.new.remove(field);
                }
            }
            Partition::Removed => {
                for elem in &mut self.removed {
                    elem.remove(field);
                }
            }
        }
    }

    fn label_of(&self, elem: &StateMap) -> String {
        elem.get(&self.key).map(render_label).unwrap_or_default()
    }

    fn pair_diffs(&self, opts: &DiffOptions) -> Vec<(Value, RecursiveDiff)> {
        self.intersect
            .iter()
            .map(|pair| {
                (
                    pair.key_value.clone(),
                    diff_recursive(&pair.old, &pair.new, opts),
                )
            })
            .collect()
    }

    fn added_diffs(&self, opts: &DiffOptions) -> Vec<(Value, RecursiveDiff)> {
        let empty = StateMap::new();
        self.added
            .iter()
            .map(|elem| {
                let key_value = elem.get(&self.key).cloned().unwrap_or(Value::Null);
                (key_value, diff_recursive(&empty, elem, opts))
            })
            .collect()
    }

    fn removed_diffs(&self, opts: &DiffOptions) -> Vec<(Value, RecursiveDiff)> {
        let empty = StateMap::new();
        self.removed
            .iter()
            .map(|elem| {
                let key_value = elem.get(&self.key).cloned().unwrap_or(Value::Null);
                (key_value, diff_recursive(elem, &empty, opts))
            })
            .collect()
    }

    fn element_diffs(
        &self,
        selection: Selection,
        opts: &DiffOptions,
    ) -> Vec<(Value, RecursiveDiff)> {
        let mut diffs = self.pair_diffs(opts);
        if selection == Selection::All {
            diffs.extend(self.added_diffs(opts));
            diffs.extend(self.removed_diffs(opts));
        }
        diffs
    }
}

fn key_of<'a>(elem: &'a StateMap, key: &str, side: ListSide, index: usize) -> Result<&'a Value> {
    elem.get(key).ok_or_else(|| DiffError::MissingCorrelationKey {
        key: key.to_string(),
        side,
        index,
        available: elem.keys().cloned().collect(),
    })
}

fn validate_keys(list: &[StateMap], side: ListSide, key: &str) -> Result<()> {
    let mut seen: Vec<&Value> = Vec::with_capacity(list.len());
    for (index, elem) in list.iter().enumerate() {
        let key_value = key_of(elem, key, side, index)?;
        if seen.contains(&key_value) {
            return Err(DiffError::DuplicateCorrelationKey {
                key: key.to_string(),
                side,
                value: render_label(key_value),
            });
        }
        seen.push(key_value);
    }
    Ok(())
}
