//! Field-level diffs between two serialized entity states

use serde_json::Value;

/// Bookkeeping fields that change on every write and are left out of diffs
const IGNORED_FIELDS: &[&str] = &["updated_at"];

const MAX_STRING_CHARS: usize = 50;

/// Summarize the top-level fields that differ between `before` and `after`
///
/// Returns `None` when nothing but bookkeeping fields changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes = match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            let mut changes = Vec::new();

            for (key, before_val) in before_obj {
                if IGNORED_FIELDS.contains(&key.as_str()) {
                    continue;
                }
                match after_obj.get(key) {
                    Some(after_val) if after_val != before_val => changes.push(format!(
                        "{}: {} -> {}",
                        key,
                        format_value(before_val),
                        format_value(after_val)
                    )),
                    Some(_) => {}
                    None => changes.push(format!(
                        "{}: {} -> (removed)",
                        key,
                        format_value(before_val)
                    )),
                }
            }

            for (key, after_val) in after_obj {
                if !before_obj.contains_key(key) && !IGNORED_FIELDS.contains(&key.as_str()) {
                    changes.push(format!("{}: (added) -> {}", key, format_value(after_val)));
                }
            }

            changes
        }
        _ if before != after => vec![format!(
            "{} -> {}",
            format_value(before),
            format_value(after)
        )],
        _ => Vec::new(),
    };

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            if s.chars().count() > MAX_STRING_CHARS {
                let head: String = s.chars().take(MAX_STRING_CHARS - 3).collect();
                format!("\"{}...\"", head)
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_changed_field_only() {
        let before = json!({"name": "Groceries", "color": "#3498db"});
        let after = json!({"name": "Groceries", "color": "#e74c3c"});

        let diff = generate_diff(&before, &after).unwrap();
        assert_eq!(diff, "color: \"#3498db\" -> \"#e74c3c\"");
    }

    #[test]
    fn test_added_and_removed_fields() {
        let before = json!({"monthly_income_goal": 300000});
        let after = json!({"monthly_savings_goal": 50000});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("monthly_income_goal: 300000 -> (removed)"));
        assert!(diff.contains("monthly_savings_goal: (added) -> 50000"));
    }

    #[test]
    fn test_updated_at_is_ignored() {
        let before = json!({"amount": 100, "updated_at": "2026-01-01T00:00:00Z"});
        let after = json!({"amount": 100, "updated_at": "2026-01-02T00:00:00Z"});

        assert!(generate_diff(&before, &after).is_none());
    }

    #[test]
    fn test_null_to_value() {
        let before = json!({"category_id": null});
        let after = json!({"category_id": "0b5c"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("category_id: null -> \"0b5c\""));
    }

    #[test]
    fn test_long_multibyte_string_is_truncated() {
        let before = json!({"description": "é".repeat(80)});
        let after = json!({"description": "short"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("...\""));
    }

    #[test]
    fn test_scalar_values() {
        assert_eq!(
            generate_diff(&json!(1), &json!(2)).as_deref(),
            Some("1 -> 2")
        );
        assert!(generate_diff(&json!("a"), &json!("a")).is_none());
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!(null)), "null");
        assert_eq!(format_value(&json!(false)), "false");
        assert_eq!(format_value(&json!([1, 2, 3])), "[3 items]");
        assert_eq!(format_value(&json!({"a": 1, "b": 2})), "{2 fields}");
    }
}
