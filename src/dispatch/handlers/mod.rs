//! The fixed key→handler table.
//!
//! Handlers are declared statically: every supported document key is bound
//! to a plain function at process start, so a signature mismatch is a
//! compile error rather than a runtime lookup surprise. An unknown key is a
//! table miss reported by the engine, never a panic.

mod fabric;
mod tenant;

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use super::{validity, value, HandlerError, HandlerFn};
use crate::plan::{Attributes, ConstructionPlan, OpId};

static TABLE: Lazy<HashMap<&'static str, HandlerFn>> = Lazy::new(|| {
    HashMap::from([
        ("fvTenant", tenant::fv_tenant as HandlerFn),
        ("fvAp", tenant::fv_ap),
        ("fvAEPg", tenant::fv_aepg),
        ("fvBD", tenant::fv_bd),
        ("fvCtx", tenant::fv_ctx),
        ("fvRsPathAtt", tenant::fv_rs_path_att),
        ("fvnsAddrInst", tenant::fvns_addr_inst),
        ("mgmtNodeGrp", fabric::mgmt_node_grp),
        ("fabricSetupPol", fabric::fabric_setup_pol),
        ("fabricNodeIdentPol", fabric::fabric_node_ident_pol),
        ("fabricPodPGrp", fabric::fabric_pod_pgrp),
        ("fabricPodP", fabric::fabric_pod_p),
    ])
});

pub fn lookup(key: &str) -> Option<HandlerFn> {
    TABLE.get(key).copied()
}

/// Supported handler keys, sorted; surfaced by the CLI so operators can see
/// which configuration domains a document may use.
pub fn supported_keys() -> Vec<&'static str> {
    let mut keys: Vec<_> = TABLE.keys().copied().collect();
    keys.sort_unstable();
    keys
}

/// Attribute set carrying only a `name`, for parent-locator objects.
fn named(name: &str) -> Attributes {
    let mut attrs = Attributes::new();
    attrs.insert("name".to_string(), name.to_string());
    attrs
}

/// If `spec[class]` holds a mapping whose `required` keys are populated,
/// append it as a child of `parent`. Absent key or failed gate: skipped,
/// not an error.
fn child_if_valid(
    plan: &mut ConstructionPlan,
    parent: OpId,
    spec: &Map<String, Value>,
    class: &'static str,
    required: &[&str],
) -> Result<(), HandlerError> {
    if let Some(rel) = spec.get(class) {
        let rel = value::object(rel)?;
        if validity::required_present(rel, required) {
            plan.push_child(parent, class, value::scalar_attrs(rel, &[]));
        }
    }
    Ok(())
}

/// List-valued counterpart of [`child_if_valid`]: each entry is gated
/// individually.
fn children_if_valid(
    plan: &mut ConstructionPlan,
    parent: OpId,
    spec: &Map<String, Value>,
    class: &'static str,
    required: &[&str],
) -> Result<(), HandlerError> {
    if let Some(list) = spec.get(class) {
        for rel in value::items(list)? {
            let rel = value::object(rel)?;
            if validity::required_present(rel, required) {
                plan.push_child(parent, class, value::scalar_attrs(rel, &[]));
            }
        }
    }
    Ok(())
}
