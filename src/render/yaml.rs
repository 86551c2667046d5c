//! Literal-preserving YAML loading for rendered templates.
//!
//! Controller attribute values are compared textually on the management
//! plane, so `007` and `1.50` must survive parsing as the exact strings the
//! template emitted. serde_yaml resolves plain scalars eagerly and cannot be
//! told otherwise, so documents are rebuilt from the yaml-rust2 event stream
//! with a restricted resolver: only the null forms resolve to a non-string
//! value; integer-, float- and boolean-shaped scalars all stay raw text.

use std::collections::HashMap;

use serde_json::{Map, Value};
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, ScanError, TScalarStyle};

/// Parse YAML text into a JSON value tree under the literal-preserving rules.
///
/// Only the first document of a stream is loaded. An empty stream yields
/// `Value::Null`.
pub fn load_literal(text: &str) -> Result<Value, ScanError> {
    let mut parser = Parser::new_from_str(text);
    let mut builder = ValueBuilder::default();
    parser.load(&mut builder, false)?;
    Ok(builder.docs.into_iter().next().unwrap_or(Value::Null))
}

/// Rewrite every string leaf equal (trimmed, case-insensitive) to `"nan"`
/// into an empty string. Upstream tabular sources stringify absent numeric
/// cells as `nan`; the rewrite neutralizes those artifacts without touching
/// any other value. Idempotent.
pub fn replace_nan_strings(value: &mut Value) {
    match value {
        Value::String(s) => {
            if s.trim().eq_ignore_ascii_case("nan") {
                s.clear();
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                replace_nan_strings(item);
            }
        }
        Value::Object(map) => {
            for item in map.values_mut() {
                replace_nan_strings(item);
            }
        }
        _ => {}
    }
}

enum Frame {
    Seq(Vec<Value>, usize),
    Map(Map<String, Value>, Option<String>, usize),
}

#[derive(Default)]
struct ValueBuilder {
    docs: Vec<Value>,
    stack: Vec<Frame>,
    anchors: HashMap<usize, Value>,
}

impl ValueBuilder {
    fn insert(&mut self, value: Value) {
        match self.stack.last_mut() {
            None => self.docs.push(value),
            Some(Frame::Seq(items, _)) => items.push(value),
            Some(Frame::Map(map, pending_key, _)) => match pending_key.take() {
                None => *pending_key = Some(key_string(value)),
                Some(key) => {
                    map.insert(key, value);
                }
            },
        }
    }

    fn insert_anchored(&mut self, value: Value, aid: usize) {
        if aid > 0 {
            self.anchors.insert(aid, value.clone());
        }
        self.insert(value);
    }
}

fn key_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

fn resolve_scalar(text: String, style: TScalarStyle, tag: Option<&Tag>) -> Value {
    if let Some(tag) = tag {
        if tag.handle == "tag:yaml.org,2002:" && tag.suffix == "null" {
            return Value::Null;
        }
        // Explicit int/float/bool/str tags all keep the raw text.
        return Value::String(text);
    }
    if style != TScalarStyle::Plain {
        return Value::String(text);
    }
    match text.as_str() {
        "" | "~" | "null" | "Null" | "NULL" => Value::Null,
        _ => Value::String(text),
    }
}

impl MarkedEventReceiver for ValueBuilder {
    fn on_event(&mut self, ev: Event, _mark: Marker) {
        match ev {
            Event::Scalar(text, style, aid, tag) => {
                let value = resolve_scalar(text, style, tag.as_ref());
                self.insert_anchored(value, aid);
            }
            Event::SequenceStart(aid, _) => {
                self.stack.push(Frame::Seq(Vec::new(), aid));
            }
            Event::SequenceEnd => {
                if let Some(Frame::Seq(items, aid)) = self.stack.pop() {
                    self.insert_anchored(Value::Array(items), aid);
                }
            }
            Event::MappingStart(aid, _) => {
                self.stack.push(Frame::Map(Map::new(), None, aid));
            }
            Event::MappingEnd => {
                if let Some(Frame::Map(map, _, aid)) = self.stack.pop() {
                    self.insert_anchored(Value::Object(map), aid);
                }
            }
            Event::Alias(aid) => {
                let value = self.anchors.get(&aid).cloned().unwrap_or(Value::Null);
                self.insert(value);
            }
            _ => {}
        }
    }
}
