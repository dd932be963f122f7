//! Discovery of inline hook snippets inside settings trees.
//!
//! Settings register hooks per event:
//!
//! ```json
//! {
//!   "hooks": {
//!     "PreToolUse": [
//!       { "code": "..." },
//!       { "matcher": "*.js", "hooks": [ { "code": "..." } ] }
//!     ]
//!   }
//! }
//! ```
//!
//! Every string `code` field is reported with an address such as
//! `PreToolUse[0].inline` or `PreToolUse[1].hooks[0].inline`. Event names
//! containing `[`, `]` or `.` are written as a bracketed JSON string
//! (`["A[0].hooks"][0].inline`) so that no two snippets share an address.
//! Nodes of the wrong shape are skipped.

use serde::Serialize;
use serde_json::Value;

/// An inline snippet and its position in the settings tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressedSnippet {
    pub address: String,
    pub content: String,
}

/// The event map of a settings document.
///
/// Accepts the full document (`{ "hooks": { ... } }`) or the bare event map.
fn event_map(tree: &Value) -> Option<&serde_json::Map<String, Value>> {
    let root = tree.as_object()?;
    match root.get("hooks") {
        Some(Value::Object(events)) => Some(events),
        _ => Some(root),
    }
}

/// Collect every inline snippet of a settings tree.
pub fn collect_inline_snippets(tree: &Value) -> Vec<AddressedSnippet> {
    let mut snippets = Vec::new();

    let Some(events) = event_map(tree) else {
        tracing::debug!("Settings tree is not an object, nothing to scan");
        return snippets;
    };

    for (event, entries) in events {
        walk_entries(&event_segment(event), entries, &mut snippets);
    }

    snippets
}

/// Address segment for an event name.
fn event_segment(event: &str) -> String {
    if event.contains(['[', ']', '.']) {
        let quoted = serde_json::to_string(event).unwrap_or_else(|_| format!("{:?}", event));
        format!("[{}]", quoted)
    } else {
        event.to_string()
    }
}

/// Walk an ordered list of hook entries under `prefix`.
fn walk_entries(prefix: &str, entries: &Value, out: &mut Vec<AddressedSnippet>) {
    let Some(entries) = entries.as_array() else {
        return;
    };

    for (index, entry) in entries.iter().enumerate() {
        let Some(entry) = entry.as_object() else {
            continue;
        };
        let base = format!("{}[{}]", prefix, index);

        if let Some(code) = entry.get("code").and_then(Value::as_str) {
            if !code.trim().is_empty() {
                out.push(AddressedSnippet {
                    address: format!("{}.inline", base),
                    content: code.to_string(),
                });
            }
        }

        if let Some(nested) = entry.get("hooks") {
            walk_entries(&format!("{}.hooks", base), nested, out);
        }
    }
}
