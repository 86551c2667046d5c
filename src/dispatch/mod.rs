//! Dispatch engine: walks a rendered document's top-level keys, runs the
//! handler registered for each key under failure isolation, and accumulates
//! construction operations plus a structured execution log.
//!
//! One malformed section must never keep the other sections of the same
//! template from being compiled; every handler runs, and the pass-level
//! success flag is the conjunction of the per-key outcomes.

pub mod handlers;
pub mod validity;
pub mod value;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{trace, warn};

use crate::plan::ConstructionPlan;
use crate::render::Document;

/// A handler turns one top-level key's value into construction operations.
pub type HandlerFn = fn(&Value, &mut ConstructionPlan) -> Result<(), HandlerError>;

/// Errors a handler can raise while building operations.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("expected a sequence of object specifications")]
    ExpectedSequence,
    #[error("expected a mapping")]
    ExpectedMapping,
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("field `{0}` is not a string")]
    WrongType(&'static str),
}

/// Outcome of processing one top-level key. Keys whose value is empty are
/// skipped without an entry, so no skip variant exists here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    Ok,
    ClassNotFound,
    Failed,
}

/// One execution-log entry; `message` is the full human-readable line that
/// also lands in the persisted audit record.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub key: String,
    pub outcome: Outcome,
    pub message: String,
}

impl LogEntry {
    fn ok(key: &str) -> Self {
        Self {
            key: key.to_string(),
            outcome: Outcome::Ok,
            message: format!("[dispatch]: class {key} was rendered successfully."),
        }
    }

    fn class_not_found(key: &str) -> Self {
        Self {
            key: key.to_string(),
            outcome: Outcome::ClassNotFound,
            message: format!("[dispatch] -> [ConfigError]: class {key} does not exist."),
        }
    }

    fn failed(key: &str, error: &HandlerError) -> Self {
        Self {
            key: key.to_string(),
            outcome: Outcome::Failed,
            message: format!("[dispatch] -> [HandlerError]: class {key} failed: {error}"),
        }
    }

    fn empty_plan() -> Self {
        Self {
            key: "*".to_string(),
            outcome: Outcome::Failed,
            message: "[dispatch] -> [ConfigError]: no object was found in configuration."
                .to_string(),
        }
    }
}

/// Result of one dispatch pass.
#[derive(Debug)]
pub struct DispatchReport {
    pub entries: Vec<LogEntry>,
    pub success: bool,
    pub ops_added: usize,
}

/// Run one dispatch pass over `document`, appending into the shared `plan`.
///
/// A pass that appends no operations at all is never successful, even when
/// every present key was legitimately skip-eligible.
pub fn dispatch(document: &Document, plan: &mut ConstructionPlan) -> DispatchReport {
    let before = plan.len();
    let mut entries = Vec::new();
    let mut failed = false;

    for (key, value) in document {
        if is_empty_value(value) {
            trace!(key, "empty value, skipped");
            continue;
        }
        match handlers::lookup(key) {
            None => {
                warn!(key, "no handler registered for document key");
                entries.push(LogEntry::class_not_found(key));
                failed = true;
            }
            Some(handler) => match handler(value, plan) {
                Ok(()) => entries.push(LogEntry::ok(key)),
                Err(e) => {
                    warn!(key, error = %e, "handler failed");
                    entries.push(LogEntry::failed(key, &e));
                    failed = true;
                }
            },
        }
    }

    let ops_added = plan.len() - before;
    if ops_added == 0 {
        entries.push(LogEntry::empty_plan());
        failed = true;
    }

    DispatchReport {
        entries,
        success: !failed,
        ops_added,
    }
}

/// Empty string, sequence, mapping or null: nothing was supplied for this
/// key, so there is nothing to act on.
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_unknown_key_is_reported_not_fatal() {
        let mut plan = ConstructionPlan::new();
        let document = doc(json!({
            "noSuchClass": [{"name": "x"}],
            "fvTenant": [{"name": "PROD"}]
        }));
        let report = dispatch(&document, &mut plan);
        assert!(!report.success);
        assert_eq!(plan.len(), 1);
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[0].outcome, Outcome::ClassNotFound);
        assert_eq!(report.entries[1].outcome, Outcome::Ok);
    }

    #[test]
    fn test_handler_failure_is_isolated() {
        let mut plan = ConstructionPlan::new();
        // fvAp items must be mappings; a bare string makes the handler fail.
        let document = doc(json!({
            "fvTenant": [{"name": "A"}],
            "fvAp": ["garbage"],
            "fvBD": [{"name": "bd1", "tenant": "A"}]
        }));
        let report = dispatch(&document, &mut plan);
        assert!(!report.success);
        let failed: Vec<_> = report
            .entries
            .iter()
            .filter(|e| e.outcome == Outcome::Failed)
            .collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].key, "fvAp");
        let ok = report
            .entries
            .iter()
            .filter(|e| e.outcome == Outcome::Ok)
            .count();
        assert_eq!(ok, 2);
        // Operations from the succeeding handlers are retained.
        assert!(plan.ops().iter().any(|op| op.class == "fvTenant"));
        assert!(plan.ops().iter().any(|op| op.class == "fvBD"));
    }

    #[test]
    fn test_empty_values_skip_silently() {
        let mut plan = ConstructionPlan::new();
        let document = doc(json!({
            "fvTenant": [],
            "fvAp": "",
            "fvBD": null,
            "fvCtx": {}
        }));
        let report = dispatch(&document, &mut plan);
        assert!(!report.success);
        assert_eq!(plan.len(), 0);
        // Only the final empty-plan entry, no per-key entries of any kind.
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].key, "*");
        assert_eq!(report.entries[0].outcome, Outcome::Failed);
        assert!(!report.entries.iter().any(|e| document.contains_key(&e.key)));
    }

    #[test]
    fn test_successful_pass() {
        let mut plan = ConstructionPlan::new();
        let document = doc(json!({"fvTenant": [{"name": "PROD"}]}));
        let report = dispatch(&document, &mut plan);
        assert!(report.success);
        assert_eq!(report.ops_added, 1);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].outcome, Outcome::Ok);
    }

    #[test]
    fn test_empty_plan_rule_spans_shared_plan() {
        let mut plan = ConstructionPlan::new();
        let first = doc(json!({"fvTenant": [{"name": "PROD"}]}));
        assert!(dispatch(&first, &mut plan).success);

        // Second pass adds nothing; prior operations do not rescue it.
        let second = doc(json!({"fvTenant": []}));
        let report = dispatch(&second, &mut plan);
        assert!(!report.success);
        assert_eq!(report.ops_added, 0);
        assert_eq!(plan.len(), 1);
    }
}
