//! The per-state outcome report.

use converge_diff::RecursiveDiff;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of one state application.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateReport {
    /// The state's identifying name.
    pub name: String,
    /// `Some(true)` on success, `Some(false)` on failure, `None` when the
    /// state was not applied (dry run).
    pub result: Option<bool>,
    /// Human-readable summary of what happened or would happen.
    pub comment: String,
    /// The changes made or pending, as produced by the diff engine.
    pub changes: Value,
}

impl StateReport {
    /// A successful report with no changes yet attached.
    pub fn succeeded(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            result: Some(true),
            comment: String::new(),
            changes: Value::Object(Default::default()),
        }
    }

    /// A failed report.
    pub fn failed(name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            result: Some(false),
            comment: comment.into(),
            changes: Value::Object(Default::default()),
        }
    }

    /// A dry-run report: the state was evaluated but not applied.
    pub fn pending(name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            result: None,
            comment: comment.into(),
            changes: Value::Object(Default::default()),
        }
    }

    /// Replace the comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Attach a changes value.
    pub fn with_changes(mut self, changes: Value) -> Self {
        self.changes = changes;
        self
    }

    /// Build a successful report straight from a recursive diff: the comment
    /// is the diff's change description and the changes field its JSON
    /// export.
    pub fn from_diff(name: impl Into<String>, diff: &RecursiveDiff) -> Self {
        let comment = if diff.is_empty() {
            "no changes required".to_string()
        } else {
            diff.changes_str()
        };
        Self {
            name: name.into(),
            result: Some(true),
            comment,
            changes: diff.to_value(),
        }
    }

    /// Returns `true` if the report carries any changes.
    pub fn changed(&self) -> bool {
        match &self.changes {
            Value::Object(map) => !map.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Null => false,
            _ => true,
        }
    }
}
