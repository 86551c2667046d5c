//! The validity predicate gating optional sub-object construction.

use serde_json::{Map, Value};

/// True iff none of the `required` keys that are actually present in `map`
/// hold a garbage value: null, empty/whitespace string, the case-insensitive
/// string `nan`, or a float NaN. Absent keys never violate — the predicate
/// is permissive by omission.
pub fn required_present(map: &Map<String, Value>, required: &[&str]) -> bool {
    required.iter().all(|key| match map.get(*key) {
        None => true,
        Some(value) => !is_garbage(value),
    })
}

fn is_garbage(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan")
        }
        Value::Number(n) => n.as_f64().is_some_and(f64::is_nan),
        _ => false,
    }
}
