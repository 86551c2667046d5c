//! Plan serialization: the flat parent-linked form is rebuilt into the
//! nested document shape the management plane accepts, either JSON or XML.

use serde_json::{json, Map, Value};

use super::{ConstructionPlan, OpId};

/// Class name of the implicit top-level anchor.
pub const ANCHOR_CLASS: &str = "polUni";

impl ConstructionPlan {
    /// Nested JSON form rooted at the anchor:
    /// `{"polUni": {"attributes": {...}, "children": [...]}}`.
    pub fn to_value(&self) -> Value {
        json!({
            ANCHOR_CLASS: {
                "attributes": {"dn": "uni"},
                "children": self.children_value(None),
            }
        })
    }

    pub fn to_json_pretty(&self) -> String {
        // The plan tree is cycle-free by construction.
        serde_json::to_string_pretty(&self.to_value()).expect("plan tree serializes")
    }

    /// Pretty XML form, one element per operation with attributes inline.
    pub fn to_xml_pretty(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("<{} dn=\"uni\"", ANCHOR_CLASS));
        if self.is_empty() {
            out.push_str("/>\n");
            return out;
        }
        out.push_str(">\n");
        for op in self.children_of(None) {
            self.write_xml(&mut out, op.id, 1);
        }
        out.push_str(&format!("</{}>\n", ANCHOR_CLASS));
        out
    }

    fn children_value(&self, parent: Option<OpId>) -> Vec<Value> {
        self.children_of(parent)
            .map(|op| {
                let mut attributes = Map::new();
                for (key, value) in &op.attributes {
                    attributes.insert(key.clone(), Value::String(value.clone()));
                }
                let mut body = Map::new();
                body.insert("attributes".to_string(), Value::Object(attributes));
                let children = self.children_value(Some(op.id));
                if !children.is_empty() {
                    body.insert("children".to_string(), Value::Array(children));
                }
                let mut node = Map::new();
                node.insert(op.class.to_string(), Value::Object(body));
                Value::Object(node)
            })
            .collect()
    }

    fn write_xml(&self, out: &mut String, id: OpId, depth: usize) {
        let op = self.op(id);
        let indent = "\t".repeat(depth);
        out.push_str(&indent);
        out.push('<');
        out.push_str(op.class);
        for (key, value) in &op.attributes {
            if !is_xml_name(key) {
                continue;
            }
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape_xml(value));
            out.push('"');
        }
        let children: Vec<OpId> = self.children_of(Some(id)).map(|c| c.id).collect();
        if children.is_empty() {
            out.push_str("/>\n");
            return;
        }
        out.push_str(">\n");
        for child in children {
            self.write_xml(out, child, depth + 1);
        }
        out.push_str(&indent);
        out.push_str("</");
        out.push_str(op.class);
        out.push_str(">\n");
    }
}

/// Attribute keys come straight from document mappings; a key that is not a
/// valid XML name cannot be emitted as an attribute, so the XML form drops
/// it. The JSON form carries every key unchanged.
fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
