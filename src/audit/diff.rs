//! Human-readable change summaries for audit entries

use serde_json::Value;

const MAX_STRING: usize = 50;

/// Describe what changed between two JSON values
///
/// Nested objects are walked and reported with dotted paths, e.g.
/// `provider.address.city: "Lima" -> "Callao"`. Returns `None` when nothing
/// changed.
pub fn diff_summary(before: &Value, after: &Value) -> Option<String> {
    let mut changes = Vec::new();
    collect(before, after, "", &mut changes);
    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn collect(before: &Value, after: &Value, prefix: &str, changes: &mut Vec<String>) {
    let (Value::Object(before_obj), Value::Object(after_obj)) = (before, after) else {
        if before != after {
            let change = format!("{} -> {}", format_value(before), format_value(after));
            changes.push(if prefix.is_empty() {
                change
            } else {
                format!("{}: {}", prefix, change)
            });
        }
        return;
    };

    for (key, before_val) in before_obj {
        let path = join(prefix, key);
        match after_obj.get(key) {
            Some(after_val) => collect(before_val, after_val, &path, changes),
            None => changes.push(format!("{}: {} -> (removed)", path, format_value(before_val))),
        }
    }

    for (key, after_val) in after_obj {
        if !before_obj.contains_key(key) {
            changes.push(format!(
                "{}: (added) -> {}",
                join(prefix, key),
                format_value(after_val)
            ));
        }
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > MAX_STRING => {
            let head: String = s.chars().take(MAX_STRING - 3).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
        other => other.to_string(),
    }
}
