//! Custom Tera filters available inside configuration templates.
//!
//! These mirror the filters operators already use in their template sets:
//! `bool` for truthy-string interpretation, `range` for expanding compact
//! node-id expressions like `101-103,105`, and `nan` for testing whether a
//! tabular cell actually carried a value.

use std::collections::HashMap;

use serde_json::Value;
use tera::{Error, Result};

/// `{{ value | bool }}` — true for `true`/`yes`/`1` (case-insensitive),
/// false otherwise. Already-boolean values pass through.
pub fn bool_filter(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    if let Value::Bool(b) = value {
        return Ok(Value::Bool(*b));
    }
    let text = stringify(value).to_lowercase();
    Ok(Value::Bool(matches!(text.as_str(), "true" | "yes" | "1")))
}

/// `{{ "101-103,105" | range }}` — expands to `[101, 102, 103, 105]`.
pub fn range_filter(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let text = stringify(value);
    let mut result = Vec::new();
    for part in text.split(',') {
        let part = part.trim();
        match part.split_once('-') {
            Some((start, end)) => {
                let start: i64 = parse_bound(start)?;
                let end: i64 = parse_bound(end)?;
                if end < start {
                    return Err(Error::msg(format!(
                        "range `{part}` runs backwards"
                    )));
                }
                result.extend((start..=end).map(Value::from));
            }
            None => result.push(Value::from(parse_bound(part)?)),
        }
    }
    Ok(Value::Array(result))
}

/// `{{ cell | nan }}` — false when the stringified value is the `nan`
/// sentinel, true for everything else.
pub fn nan_filter(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::Bool(stringify(value) != "nan"))
}

fn parse_bound(text: &str) -> Result<i64> {
    text.trim()
        .parse()
        .map_err(|_| Error::msg(format!("`{text}` is not an integer")))
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
