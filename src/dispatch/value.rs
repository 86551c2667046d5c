//! Shape helpers handlers use to pick document values apart.

use serde_json::{Map, Value};

use super::HandlerError;
use crate::plan::Attributes;

/// Expect a sequence of entries (a handler's value is normally a list of
/// object specifications).
pub fn items(value: &Value) -> Result<&Vec<Value>, HandlerError> {
    value.as_array().ok_or(HandlerError::ExpectedSequence)
}

/// Expect a mapping.
pub fn object(value: &Value) -> Result<&Map<String, Value>, HandlerError> {
    value.as_object().ok_or(HandlerError::ExpectedMapping)
}

/// A required string field; rendered documents carry every scalar as text,
/// so anything else is a shape error.
pub fn str_field<'a>(map: &'a Map<String, Value>, key: &'static str) -> Result<&'a str, HandlerError> {
    match map.get(key) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(HandlerError::WrongType(key)),
        None => Err(HandlerError::MissingField(key)),
    }
}

/// Collect the scalar entries of a mapping as the managed object's attribute
/// set. Nested mappings and sequences are child-object specifications, and
/// `exclude` names the parent-locator keys a handler consumes itself;
/// neither belongs on the object.
pub fn scalar_attrs(map: &Map<String, Value>, exclude: &[&str]) -> Attributes {
    let mut attrs = Attributes::new();
    for (key, value) in map {
        if exclude.contains(&key.as_str()) {
            continue;
        }
        match value {
            Value::String(s) => {
                attrs.insert(key.clone(), s.clone());
            }
            Value::Bool(b) => {
                attrs.insert(key.clone(), b.to_string());
            }
            Value::Number(n) => {
                attrs.insert(key.clone(), n.to_string());
            }
            _ => {}
        }
    }
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_items_and_object() {
        assert!(items(&json!([1, 2])).is_ok());
        assert!(items(&json!({"a": 1})).is_err());
        assert!(object(&json!({"a": 1})).is_ok());
        assert!(object(&json!([1])).is_err());
    }

    #[test]
    fn test_str_field() {
        let map = object(&json!({"name": "web", "nested": {}})).unwrap().clone();
        assert_eq!(str_field(&map, "name").unwrap(), "web");
        assert!(matches!(
            str_field(&map, "missing"),
            Err(HandlerError::MissingField("missing"))
        ));
        assert!(matches!(
            str_field(&map, "nested"),
            Err(HandlerError::WrongType("nested"))
        ));
    }

    #[test]
    fn test_scalar_attrs_skips_children_and_excluded() {
        let map = object(&json!({
            "name": "web",
            "tenant": "PROD",
            "fvRsBd": {"tnFvBDName": "bd1"},
            "fvSubnet": [{"ip": "10.0.0.1/24"}]
        }))
        .unwrap()
        .clone();
        let attrs = scalar_attrs(&map, &["tenant"]);
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs["name"], "web");
    }
}
