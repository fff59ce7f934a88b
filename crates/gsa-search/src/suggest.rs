//! Decoder for the suggest endpoint's `rich` JSON response.

use serde_json::Value;
use tracing::warn;

/// Extract suggestion names in response order.
///
/// Suggestions are non-critical, so any parse error or unexpected shape
/// yields an empty list instead of an error.
pub fn decode_suggestions(json: &str) -> Vec<String> {
    let root: Value = match serde_json::from_str(json) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "Suggestion response is not JSON");
            return Vec::new();
        }
    };

    match suggestion_names(&root) {
        Some(names) => names,
        None => {
            warn!("Suggestion response has an unexpected shape");
            Vec::new()
        }
    }
}

fn suggestion_names(root: &Value) -> Option<Vec<String>> {
    // The suggestions sit in the last top-level member: the `results`
    // property of the rich object, or the last element of an array body.
    let last = match root {
        Value::Object(map) => map.values().last()?,
        Value::Array(items) => items.last()?,
        _ => return None,
    };

    let entries = match last.as_array()?.first() {
        Some(Value::Array(nested)) => nested,
        _ => last.as_array()?,
    };

    entries
        .iter()
        .map(|entry| entry.get("name")?.as_str().map(str::to_string))
        .collect()
}
