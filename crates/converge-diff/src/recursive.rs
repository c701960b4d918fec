//! Recursive mapping diff with dotted-path views.
//!
//! Compares two arbitrarily nested mappings and produces a pruned tree of
//! differences plus flattened dotted-path accessors. A key that is an object
//! on both sides recurses; everything else is compared by equality, so a
//! mapping-vs-scalar mismatch is a change, never an error.
//!
//! The walk uses an explicit worklist rather than native recursion, so
//! arbitrarily deep inputs cannot overflow the call stack.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::value::{render_side, StateMap};

/// How the ignore list is applied while walking nested mappings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IgnoreScope {
    /// Strip ignored keys at the top level only.
    #[default]
    TopLevel,
    /// Strip ignored keys at every nesting level.
    AllLevels,
}

/// Options controlling a recursive diff.
#[derive(Clone, Debug)]
pub struct DiffOptions {
    /// Drop keys that exist only in `old` from the diff entirely. Used when
    /// the caller only cares about convergence toward `new` and keys the
    /// desired state does not mention should not count as drift.
    pub ignore_missing_keys: bool,
    /// Keys stripped from comparison before descending.
    pub ignore_keys: Vec<String>,
    /// Where `ignore_keys` applies.
    pub ignore_scope: IgnoreScope,
    /// Exclude paths touching an absent side from `changed()`. When false,
    /// such paths appear in `changed()` as well as `added()`/`removed()`.
    pub ignore_unset_values: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            ignore_missing_keys: false,
            ignore_keys: Vec::new(),
            ignore_scope: IgnoreScope::TopLevel,
            ignore_unset_values: true,
        }
    }
}

/// One node of a diff tree.
#[derive(Clone, Debug, PartialEq)]
pub enum DiffNode {
    /// A leaf difference. `None` on a side means the key is absent there,
    /// which is distinct from a present JSON null.
    Leaf {
        old: Option<Value>,
        new: Option<Value>,
    },
    /// Differences inside a mapping that is present on both sides.
    Branch(BTreeMap<String, DiffNode>),
}

impl DiffNode {
    /// JSON export of this node: leaves become `{"old": ..., "new": ...}`
    /// objects with absent sides collapsed to JSON null.
    pub fn to_value(&self) -> Value {
        match self {
            DiffNode::Leaf { old, new } => {
                let mut leaf = StateMap::new();
                leaf.insert("old".into(), old.clone().unwrap_or(Value::Null));
                leaf.insert("new".into(), new.clone().unwrap_or(Value::Null));
                Value::Object(leaf)
            }
            DiffNode::Branch(children) => Value::Object(
                children
                    .iter()
                    .map(|(k, node)| (k.clone(), node.to_value()))
                    .collect(),
            ),
        }
    }
}

/// The result of a recursive diff.
///
/// Immutable once constructed; every accessor is a pure derived view, so
/// repeated calls return equal results. The inputs are cloned at
/// construction and caller-owned structures are never touched.
#[derive(Clone, Debug)]
pub struct RecursiveDiff {
    nodes: BTreeMap<String, DiffNode>,
    old: StateMap,
    new: StateMap,
    ignore_unset_values: bool,
}

/// Compute the recursive diff between two nested mappings.
///
/// # Examples
///
/// ```
/// use converge_diff::{diff_recursive, DiffOptions, StateMap};
/// use serde_json::json;
///
/// let mut old = StateMap::new();
/// old.insert("a".into(), json!("a"));
/// let mut new = StateMap::new();
/// new.insert("a".into(), json!("a"));
/// new.insert("b".into(), json!("b"));
///
/// let diff = diff_recursive(&old, &new, &DiffOptions::default());
/// assert_eq!(diff.added(".", false), vec!["b"]);
/// assert!(diff.removed(".", false).is_empty());
/// ```
pub fn diff_recursive(old: &StateMap, new: &StateMap, opts: &DiffOptions) -> RecursiveDiff {
    struct Frame<'a> {
        path: Vec<String>,
        old: &'a StateMap,
        new: &'a StateMap,
        top: bool,
    }

    let mut nodes = BTreeMap::new();
    let mut stack = vec![Frame {
        path: Vec::new(),
        old,
        new,
        top: true,
    }];

    while let Some(frame) = stack.pop() {
        let keys: BTreeSet<&String> = frame.old.keys().chain(frame.new.keys()).collect();
        for key in keys {
            let ignorable = frame.top || opts.ignore_scope == IgnoreScope::AllLevels;
            if ignorable && opts.ignore_keys.iter().any(|k| k == key) {
                continue;
            }

            let mut path = frame.path.clone();
            path.push(key.clone());

            match (frame.old.get(key), frame.new.get(key)) {
                // Object pairs become frames before any equality check, so
                // equal-but-deep subtrees never trigger a recursive compare;
                // an equal pair simply produces a frame with no leaves.
                (Some(Value::Object(old_sub)), Some(Value::Object(new_sub))) => {
                    stack.push(Frame {
                        path,
                        old: old_sub,
                        new: new_sub,
                        top: false,
                    });
                }
                (Some(old_val), Some(new_val)) if old_val == new_val => {}
                (Some(old_val), Some(new_val)) => {
                    insert_leaf(
                        &mut nodes,
                        &path,
                        Some(old_val.clone()),
                        Some(new_val.clone()),
                    );
                }
                (Some(old_val), None) => {
                    if !opts.ignore_missing_keys {
                        insert_leaf(&mut nodes, &path, Some(old_val.clone()), None);
                    }
                }
                (None, Some(new_val)) => {
                    insert_leaf(&mut nodes, &path, None, Some(new_val.clone()));
                }
                (None, None) => {}
            }
        }
    }

    RecursiveDiff {
        nodes,
        old: old.clone(),
        new: new.clone(),
        ignore_unset_values: opts.ignore_unset_values,
    }
}

/// Insert a leaf at a dotted location, creating branch nodes on the way.
fn insert_leaf(
    nodes: &mut BTreeMap<String, DiffNode>,
    path: &[String],
    old: Option<Value>,
    new: Option<Value>,
) {
    let Some((last, prefix)) = path.split_last() else {
        return;
    };
    let mut current = nodes;
    for segment in prefix {
        let entry = current
            .entry(segment.clone())
            .or_insert_with(|| DiffNode::Branch(BTreeMap::new()));
        match entry {
            DiffNode::Branch(children) => current = children,
            // A path segment can only ever be a branch: a key is either an
            // object on both sides (branch frame) or a leaf, never both.
            DiffNode::Leaf { .. } => return,
        }
    }
    current.insert(last.clone(), DiffNode::Leaf { old, new });
}

impl RecursiveDiff {
    /// Returns `true` if the two mappings are equal under the options used.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of leaf differences in the tree.
    pub fn len(&self) -> usize {
        fn count(nodes: &BTreeMap<String, DiffNode>) -> usize {
            nodes
                .values()
                .map(|node| match node {
                    DiffNode::Leaf { .. } => 1,
                    DiffNode::Branch(children) => count(children),
                })
                .sum()
        }
        count(&self.nodes)
    }

    /// The pruned diff tree: only the parts that differ, with
    /// `{old, new}` leaves.
    pub fn diffs(&self) -> &BTreeMap<String, DiffNode> {
        &self.nodes
    }

    /// Dotted paths whose old side is absent.
    ///
    /// With `include_nested`, the structure of a newly added object is
    /// walked too, so `a.b` and `a.b.c` are both reported when `b` is an
    /// added object containing `c`. Without it only the shallowest added
    /// path appears.
    pub fn added(&self, separator: &str, include_nested: bool) -> Vec<String> {
        let mut paths = Vec::new();
        collect_absent(
            &self.nodes,
            "",
            separator,
            include_nested,
            AbsentSide::Old,
            &mut paths,
        );
        paths
    }

    /// Dotted paths whose new side is absent. Mirror image of [`added`].
    ///
    /// [`added`]: RecursiveDiff::added
    pub fn removed(&self, separator: &str, include_nested: bool) -> Vec<String> {
        let mut paths = Vec::new();
        collect_absent(
            &self.nodes,
            "",
            separator,
            include_nested,
            AbsentSide::New,
            &mut paths,
        );
        paths
    }

    /// Dotted paths present on both sides with unequal values.
    ///
    /// Paths touching an absent side are excluded when the diff was built
    /// with `ignore_unset_values` (the default); otherwise they are
    /// included here in addition to `added()`/`removed()`.
    pub fn changed(&self, separator: &str) -> Vec<String> {
        fn collect(
            nodes: &BTreeMap<String, DiffNode>,
            prefix: &str,
            separator: &str,
            include_unset: bool,
            out: &mut Vec<String>,
        ) {
            for (key, node) in nodes {
                let path = join_path(prefix, key, separator);
                match node {
                    DiffNode::Branch(children) => {
                        collect(children, &path, separator, include_unset, out);
                    }
                    DiffNode::Leaf {
                        old: Some(_),
                        new: Some(_),
                    } => out.push(path),
                    DiffNode::Leaf { .. } => {
                        if include_unset {
                            out.push(path);
                        }
                    }
                }
            }
        }

        let mut paths = Vec::new();
        collect(
            &self.nodes,
            "",
            separator,
            !self.ignore_unset_values,
            &mut paths,
        );
        paths
    }

    /// Dotted paths present on both sides with equal values: top-level keys
    /// with no recorded diff, plus nested unchanged keys under partially
    /// changed branches.
    pub fn unchanged(&self, separator: &str) -> Vec<String> {
        fn collect(
            old: &StateMap,
            new: &StateMap,
            nodes: &BTreeMap<String, DiffNode>,
            prefix: &str,
            separator: &str,
            out: &mut Vec<String>,
        ) {
            for (key, new_val) in new {
                let path = join_path(prefix, key, separator);
                match nodes.get(key) {
                    None => {
                        if old.contains_key(key) {
                            out.push(path);
                        }
                    }
                    Some(DiffNode::Branch(children)) => {
                        if let (Some(Value::Object(old_sub)), Value::Object(new_sub)) =
                            (old.get(key), new_val)
                        {
                            collect(old_sub, new_sub, children, &path, separator, out);
                        }
                    }
                    Some(DiffNode::Leaf { .. }) => {}
                }
            }
        }

        let mut paths = Vec::new();
        collect(&self.old, &self.new, &self.nodes, "", separator, &mut paths);
        paths
    }

    /// The old side's bare values in the shape of the diff tree. Keys absent
    /// from the old side are omitted.
    pub fn old_values(&self) -> StateMap {
        side_values(&self.nodes, LeafSide::Old)
    }

    /// The new side's bare values in the shape of the diff tree. Keys absent
    /// from the new side are omitted.
    pub fn new_values(&self) -> StateMap {
        side_values(&self.nodes, LeafSide::New)
    }

    /// Human-readable change description, one line per leaf.
    ///
    /// Scalar top-level changes read `key from <old> to <new>`; changes
    /// inside a nested mapping are grouped under `key:` and indented, with
    /// dotted sub-paths. Absent sides print as the word `nothing`.
    pub fn changes_str(&self) -> String {
        let mut lines = Vec::new();
        for (key, node) in &self.nodes {
            match node {
                DiffNode::Leaf { old, new } => {
                    lines.push(format!(
                        "{key} from {} to {}",
                        render_side(old.as_ref()),
                        render_side(new.as_ref())
                    ));
                }
                DiffNode::Branch(children) => {
                    lines.push(format!("{key}:"));
                    let mut nested = Vec::new();
                    collect_change_lines(children, "", &mut nested);
                    for line in nested {
                        lines.push(format!("  {line}"));
                    }
                }
            }
        }
        lines.join("\n")
    }

    /// JSON export of the whole diff tree. Absent sides are collapsed to
    /// JSON null; callers that must distinguish an absent key from a
    /// present null should read the typed tree via [`diffs`].
    ///
    /// [`diffs`]: RecursiveDiff::diffs
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.nodes
                .iter()
                .map(|(k, node)| (k.clone(), node.to_value()))
                .collect(),
        )
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum AbsentSide {
    Old,
    New,
}

#[derive(Clone, Copy)]
enum LeafSide {
    Old,
    New,
}

fn join_path(prefix: &str, key: &str, separator: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}{separator}{key}")
    }
}

fn collect_absent(
    nodes: &BTreeMap<String, DiffNode>,
    prefix: &str,
    separator: &str,
    include_nested: bool,
    side: AbsentSide,
    out: &mut Vec<String>,
) {
    for (key, node) in nodes {
        let path = join_path(prefix, key, separator);
        match node {
            DiffNode::Branch(children) => {
                collect_absent(children, &path, separator, include_nested, side, out);
            }
            DiffNode::Leaf { old, new } => {
                let (absent, present) = match side {
                    AbsentSide::Old => (old, new),
                    AbsentSide::New => (new, old),
                };
                if absent.is_none() {
                    out.push(path.clone());
                    if include_nested {
                        if let Some(Value::Object(map)) = present {
                            collect_object_paths(map, &path, separator, out);
                        }
                    }
                }
            }
        }
    }
}

fn collect_object_paths(map: &StateMap, prefix: &str, separator: &str, out: &mut Vec<String>) {
    for (key, value) in map {
        let path = format!("{prefix}{separator}{key}");
        out.push(path.clone());
        if let Value::Object(nested) = value {
            collect_object_paths(nested, &path, separator, out);
        }
    }
}

fn side_values(nodes: &BTreeMap<String, DiffNode>, side: LeafSide) -> StateMap {
    let mut map = StateMap::new();
    for (key, node) in nodes {
        match node {
            DiffNode::Branch(children) => {
                let nested = side_values(children, side);
                if !nested.is_empty() {
                    map.insert(key.clone(), Value::Object(nested));
                }
            }
            DiffNode::Leaf { old, new } => {
                let value = match side {
                    LeafSide::Old => old,
                    LeafSide::New => new,
                };
                if let Some(value) = value {
                    map.insert(key.clone(), value.clone());
                }
            }
        }
    }
    map
}

fn collect_change_lines(nodes: &BTreeMap<String, DiffNode>, prefix: &str, out: &mut Vec<String>) {
    for (key, node) in nodes {
        let path = join_path(prefix, key, ".");
        match node {
            DiffNode::Leaf { old, new } => {
                out.push(format!(
                    "{path} from {} to {}",
                    render_side(old.as_ref()),
                    render_side(new.as_ref())
                ));
            }
            DiffNode::Branch(children) => collect_change_lines(children, &path, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_map(value: Value) -> StateMap {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {:?}", other),
        }
    }

    fn diff(old: Value, new: Value) -> RecursiveDiff {
        diff_recursive(&make_map(old), &make_map(new), &DiffOptions::default())
    }

    #[test]
    fn added_top_level_key() {
        let d = diff(json!({"a": "a"}), json!({"a": "a", "b": "b"}));
        assert_eq!(d.added(".", false), vec!["b"]);
        assert!(d.removed(".", false).is_empty());
        assert!(d.changed(".").is_empty());
    }

    #[test]
    fn removed_nested_key() {
        let d = diff(json!({"a": {"b": "b"}}), json!({"a": {}}));
        assert_eq!(d.removed(".", false), vec!["a.b"]);
        assert!(d.added(".", false).is_empty());
    }

    #[test]
    fn changed_and_unchanged_partition() {
        let d = diff(
            json!({"a": "a", "unchanged": true}),
            json!({"a": "b", "unchanged": true}),
        );
        assert_eq!(d.changed("."), vec!["a"]);
        assert_eq!(d.unchanged("."), vec!["unchanged"]);
    }

    #[test]
    fn changes_str_for_added_key() {
        let d = diff(json!({"a": "a"}), json!({"a": "a", "b": "b"}));
        assert_eq!(d.changes_str(), "b from nothing to 'b'");
    }

    #[test]
    fn changes_str_groups_nested_changes() {
        let d = diff(
            json!({"service": {"port": 80, "proto": "tcp"}}),
            json!({"service": {"port": 443, "proto": "tcp"}}),
        );
        assert_eq!(d.changes_str(), "service:\n  port from 80 to 443");
    }

    #[test]
    fn equal_nested_subtree_is_unchanged_not_changed() {
        let d = diff(
            json!({"a": {"x": 1, "y": 2}, "b": 1}),
            json!({"a": {"x": 1, "y": 2}, "b": 2}),
        );
        assert_eq!(d.changed("."), vec!["b"]);
        assert_eq!(d.unchanged("."), vec!["a"]);
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn partially_changed_branch_lists_nested_unchanged() {
        let d = diff(
            json!({"a": {"x": 1, "y": 2}}),
            json!({"a": {"x": 1, "y": 3}}),
        );
        assert_eq!(d.changed("."), vec!["a.y"]);
        assert_eq!(d.unchanged("."), vec!["a.x"]);
    }

    #[test]
    fn mapping_vs_scalar_is_changed() {
        let d = diff(json!({"a": {"b": 1}}), json!({"a": "scalar"}));
        assert_eq!(d.changed("."), vec!["a"]);
        assert!(d.added(".", false).is_empty());
    }

    #[test]
    fn absent_key_distinct_from_null_value() {
        // A present null on both sides is no change at all.
        let d = diff(json!({"a": null}), json!({"a": null}));
        assert!(d.is_empty());

        // null -> value is a change, not an addition.
        let d = diff(json!({"a": null}), json!({"a": 1}));
        assert_eq!(d.changed("."), vec!["a"]);
        assert!(d.added(".", false).is_empty());

        // absent -> null is an addition, not a change.
        let d = diff(json!({}), json!({"a": null}));
        assert_eq!(d.added(".", false), vec!["a"]);
        assert!(d.changed(".").is_empty());
    }

    #[test]
    fn include_nested_walks_added_objects() {
        let d = diff(json!({}), json!({"a": {"b": {"c": 1}}}));
        assert_eq!(d.added(".", false), vec!["a"]);
        assert_eq!(d.added(".", true), vec!["a", "a.b", "a.b.c"]);
    }

    #[test]
    fn include_nested_walks_removed_objects() {
        let d = diff(json!({"a": {"b": 1}}), json!({}));
        assert_eq!(d.removed(".", true), vec!["a", "a.b"]);
    }

    #[test]
    fn custom_separator() {
        let d = diff(json!({"a": {"b": 1}}), json!({"a": {"b": 2}}));
        assert_eq!(d.changed(":"), vec!["a:b"]);
    }

    #[test]
    fn ignore_keys_top_level_only_by_default() {
        let opts = DiffOptions {
            ignore_keys: vec!["volatile".into()],
            ..Default::default()
        };
        let old = make_map(json!({"volatile": 1, "a": {"volatile": 1}}));
        let new = make_map(json!({"volatile": 2, "a": {"volatile": 2}}));

        let d = diff_recursive(&old, &new, &opts);
        assert_eq!(d.changed("."), vec!["a.volatile"]);
    }

    #[test]
    fn ignore_keys_at_all_levels() {
        let opts = DiffOptions {
            ignore_keys: vec!["volatile".into()],
            ignore_scope: IgnoreScope::AllLevels,
            ..Default::default()
        };
        let old = make_map(json!({"volatile": 1, "a": {"volatile": 1}}));
        let new = make_map(json!({"volatile": 2, "a": {"volatile": 2}}));

        let d = diff_recursive(&old, &new, &opts);
        assert!(d.is_empty());
    }

    #[test]
    fn ignore_missing_keys_drops_old_only_keys() {
        let opts = DiffOptions {
            ignore_missing_keys: true,
            ..Default::default()
        };
        let old = make_map(json!({"gone": 1, "a": "a"}));
        let new = make_map(json!({"a": "b"}));

        let d = diff_recursive(&old, &new, &opts);
        assert!(d.removed(".", false).is_empty());
        assert_eq!(d.changed("."), vec!["a"]);
    }

    #[test]
    fn unset_paths_join_changed_when_not_ignored() {
        let opts = DiffOptions {
            ignore_unset_values: false,
            ..Default::default()
        };
        let old = make_map(json!({"gone": 1}));
        let new = make_map(json!({"fresh": 2}));

        let d = diff_recursive(&old, &new, &opts);
        // The overlap with added()/removed() is intentional.
        assert_eq!(d.changed("."), vec!["fresh", "gone"]);
        assert_eq!(d.added(".", false), vec!["fresh"]);
        assert_eq!(d.removed(".", false), vec!["gone"]);
    }

    #[test]
    fn old_and_new_values_follow_tree_shape() {
        let d = diff(
            json!({"a": {"x": 1}, "b": "old"}),
            json!({"a": {"x": 2}, "c": "new"}),
        );
        let old_vals = d.old_values();
        let new_vals = d.new_values();

        assert_eq!(Value::Object(old_vals), json!({"a": {"x": 1}, "b": "old"}));
        assert_eq!(Value::Object(new_vals), json!({"a": {"x": 2}, "c": "new"}));
    }

    #[test]
    fn to_value_collapses_absent_to_null() {
        let d = diff(json!({"a": 1}), json!({"b": 2}));
        assert_eq!(
            d.to_value(),
            json!({
                "a": {"old": 1, "new": null},
                "b": {"old": null, "new": 2},
            })
        );
    }

    #[test]
    fn accessors_are_repeatable() {
        let d = diff(json!({"a": 1}), json!({"a": 2, "b": 3}));
        assert_eq!(d.changed("."), d.changed("."));
        assert_eq!(d.added(".", true), d.added(".", true));
        assert_eq!(d.changes_str(), d.changes_str());
    }

    #[test]
    fn deeply_nested_input_does_not_overflow() {
        // Build a deep chain iteratively; the worklist walk must not recurse
        // natively over it.
        let mut old_leaf = json!("same");
        let mut new_leaf = json!("same");
        for _ in 0..3_000 {
            old_leaf = json!({ "n": old_leaf });
            new_leaf = json!({ "n": new_leaf });
        }
        let old = make_map(json!({ "root": old_leaf }));
        let new = make_map(json!({ "root": new_leaf }));

        let d = diff_recursive(&old, &new, &DiffOptions::default());
        assert!(d.is_empty());

        let mut new_differing = json!("different");
        for _ in 0..3_000 {
            new_differing = json!({ "n": new_differing });
        }
        let new = make_map(json!({ "root": new_differing }));
        let d = diff_recursive(&old, &new, &DiffOptions::default());
        assert_eq!(d.len(), 1);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn value_strategy() -> impl Strategy<Value = Value> {
            let leaf = prop_oneof![
                Just(Value::Null),
                any::<bool>().prop_map(Value::Bool),
                any::<i64>().prop_map(|n| Value::Number(n.into())),
                "[a-z]{0,6}".prop_map(Value::String),
            ];
            leaf.prop_recursive(3, 24, 4, |inner| {
                proptest::collection::btree_map("[a-z]{1,3}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect()))
            })
        }

        fn nested_map_strategy() -> impl Strategy<Value = StateMap> {
            proptest::collection::btree_map("[a-z]{1,3}", value_strategy(), 0..5)
                .prop_map(|m| m.into_iter().collect())
        }

        fn scalar_map_strategy() -> impl Strategy<Value = StateMap> {
            proptest::collection::btree_map(
                "[a-z]{1,3}",
                prop_oneof![
                    Just(Value::Null),
                    any::<bool>().prop_map(Value::Bool),
                    any::<i64>().prop_map(|n| Value::Number(n.into())),
                    "[a-z]{0,6}".prop_map(Value::String),
                ],
                0..6,
            )
            .prop_map(|m| m.into_iter().collect())
        }

        proptest! {
            #[test]
            fn equal_inputs_produce_empty_diff(map in nested_map_strategy()) {
                let d = diff_recursive(&map, &map, &DiffOptions::default());
                prop_assert!(d.is_empty());
                prop_assert!(d.added(".", false).is_empty());
                prop_assert!(d.removed(".", false).is_empty());
                prop_assert!(d.changed(".").is_empty());
            }

            #[test]
            fn top_level_partition_is_total(
                old in scalar_map_strategy(),
                new in scalar_map_strategy(),
            ) {
                let d = diff_recursive(&old, &new, &DiffOptions::default());
                let added = d.added(".", false);
                let removed = d.removed(".", false);
                let changed = d.changed(".");
                let unchanged = d.unchanged(".");

                let mut union: BTreeSet<String> = BTreeSet::new();
                union.extend(added.iter().cloned());
                union.extend(removed.iter().cloned());
                union.extend(changed.iter().cloned());
                union.extend(unchanged.iter().cloned());

                let mut expected: BTreeSet<String> = old.keys().cloned().collect();
                expected.extend(new.keys().cloned());

                prop_assert_eq!(&union, &expected);
                // Disjointness: the union's size equals the sum of the parts.
                prop_assert_eq!(
                    union.len(),
                    added.len() + removed.len() + changed.len() + unchanged.len()
                );
            }

            #[test]
            fn added_mirrors_removed(
                old in nested_map_strategy(),
                new in nested_map_strategy(),
            ) {
                let forward = diff_recursive(&old, &new, &DiffOptions::default());
                let backward = diff_recursive(&new, &old, &DiffOptions::default());
                prop_assert_eq!(forward.added(".", false), backward.removed(".", false));
                prop_assert_eq!(forward.removed(".", false), backward.added(".", false));
            }
        }
    }
}
