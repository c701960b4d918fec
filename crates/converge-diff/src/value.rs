//! Shared value types and rendering helpers.
//!
//! State is modeled the way callers hand it over: string keys mapped to
//! arbitrary JSON-like values ([`serde_json::Value`]). A key that is absent
//! on one side of a comparison is represented as `Option::None` at the diff
//! leaf, which keeps it distinct from a present JSON null.

use serde_json::Value;

/// A state mapping: string keys to arbitrary JSON-like values.
///
/// Nested objects recurse through the diff engine; everything else is
/// compared by equality. The default (sorted) map backend gives
/// deterministic iteration order for all derived views.
pub type StateMap = serde_json::Map<String, Value>;

/// Placeholder printed for a key that is absent on one side.
pub(crate) const ABSENT: &str = "nothing";

/// Render one side of a diff leaf for human-readable output.
pub(crate) fn render_side(value: Option<&Value>) -> String {
    match value {
        None => ABSENT.to_string(),
        Some(v) => render_value(v),
    }
}

/// Render a value for change descriptions: strings single-quoted, arrays
/// comma-joined, everything else in its JSON form.
pub(crate) fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'"),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// Render a correlation-key value as a bare label (no quoting).
pub(crate) fn render_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
