//! Fabric- and infra-scope handlers: node management, fabric membership and
//! pod policies. These roots hang off fixed scaffold containers
//! (`infraInfra`, `ctrlrInst`, `fabricInst`) rather than a tenant.

use serde_json::Value;

use super::{child_if_valid, children_if_valid, HandlerError};
use crate::dispatch::value::{items, object, scalar_attrs};
use crate::plan::{Attributes, ConstructionPlan};

/// Tenants > mgmt > Node Management Addresses
pub fn mgmt_node_grp(value: &Value, plan: &mut ConstructionPlan) -> Result<(), HandlerError> {
    let entries = items(value)?;
    let infra = plan.push_root("infraInfra", Attributes::new());
    for item in entries {
        let item = object(item)?;
        let grp = plan.push_child(infra, "mgmtNodeGrp", scalar_attrs(item, &[]));
        children_if_valid(plan, grp, item, "mgmtRsGrp", &[])?;
        children_if_valid(plan, grp, item, "infraNodeBlk", &["from_"])?;
    }
    Ok(())
}

/// Fabric > Inventory > Pod Fabric Setup Policy
pub fn fabric_setup_pol(value: &Value, plan: &mut ConstructionPlan) -> Result<(), HandlerError> {
    let entries = items(value)?;
    let inst = plan.push_root("ctrlrInst", Attributes::new());
    for item in entries {
        let item = object(item)?;
        let pol = plan.push_child(inst, "fabricSetupPol", scalar_attrs(item, &[]));
        children_if_valid(plan, pol, item, "fabricSetupP", &[])?;
    }
    Ok(())
}

/// Fabric > Inventory > Fabric Membership
pub fn fabric_node_ident_pol(
    value: &Value,
    plan: &mut ConstructionPlan,
) -> Result<(), HandlerError> {
    let entries = items(value)?;
    let inst = plan.push_root("ctrlrInst", Attributes::new());
    for item in entries {
        let item = object(item)?;
        let pol = plan.push_child(inst, "fabricNodeIdentPol", scalar_attrs(item, &[]));
        children_if_valid(plan, pol, item, "fabricNodeIdentP", &[])?;
    }
    Ok(())
}

/// Fabric > Fabric Policies > Pods > Policy Groups
pub fn fabric_pod_pgrp(value: &Value, plan: &mut ConstructionPlan) -> Result<(), HandlerError> {
    const RELATIONS: &[&str] = &[
        "fabricRsSnmpPol",
        "fabricRsPodPGrpIsisDomP",
        "fabricRsPodPGrpCoopP",
        "fabricRsPodPGrpBGPRRP",
        "fabricRsTimePol",
        "fabricRsMacsecPol",
        "fabricRsCommPol",
    ];
    let entries = items(value)?;
    let inst = plan.push_root("fabricInst", Attributes::new());
    let funcp = plan.push_child(inst, "fabricFuncP", Attributes::new());
    for item in entries {
        let item = object(item)?;
        let grp = plan.push_child(funcp, "fabricPodPGrp", scalar_attrs(item, &[]));
        for relation in RELATIONS {
            child_if_valid(plan, grp, item, relation, &[])?;
        }
    }
    Ok(())
}

/// Fabric > Fabric Policies > Pods > Profiles
pub fn fabric_pod_p(value: &Value, plan: &mut ConstructionPlan) -> Result<(), HandlerError> {
    let entries = items(value)?;
    let inst = plan.push_root("fabricInst", Attributes::new());
    for item in entries {
        let item = object(item)?;
        let profile = plan.push_child(inst, "fabricPodP", scalar_attrs(item, &[]));
        if let Some(selectors) = item.get("fabricPodS") {
            for selector in items(selectors)? {
                let selector = object(selector)?;
                let pod_s =
                    plan.push_child(profile, "fabricPodS", scalar_attrs(selector, &[]));
                child_if_valid(plan, pod_s, selector, "fabricRsPodPGrp", &[])?;
                child_if_valid(plan, pod_s, selector, "fabricPodBlk", &[])?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn classes(plan: &ConstructionPlan) -> Vec<&'static str> {
        plan.ops().iter().map(|op| op.class).collect()
    }

    #[test]
    fn test_mgmt_node_grp_scaffold_and_blocks() {
        let mut plan = ConstructionPlan::new();
        mgmt_node_grp(
            &json!([{
                "name": "leaf-mgmt",
                "mgmtRsGrp": [{"tDn": "uni/infra/funcprof/grp-oob"}],
                "infraNodeBlk": [
                    {"name": "b1", "from_": "101", "to_": "103"},
                    {"name": "b2", "from_": "nan"}
                ]
            }]),
            &mut plan,
        )
        .unwrap();
        assert_eq!(
            classes(&plan),
            ["infraInfra", "mgmtNodeGrp", "mgmtRsGrp", "infraNodeBlk"]
        );
        assert_eq!(plan.ops()[3].attributes["from_"], "101");
    }

    #[test]
    fn test_fabric_setup_pol_chains_under_controller_instance() {
        let mut plan = ConstructionPlan::new();
        fabric_setup_pol(
            &json!([{
                "fabricSetupP": [{"podId": "1", "tepPool": "10.0.0.0/16"}]
            }]),
            &mut plan,
        )
        .unwrap();
        assert_eq!(classes(&plan), ["ctrlrInst", "fabricSetupPol", "fabricSetupP"]);
    }

    #[test]
    fn test_fabric_node_ident_pol_membership_rows() {
        let mut plan = ConstructionPlan::new();
        fabric_node_ident_pol(
            &json!([{
                "fabricNodeIdentP": [
                    {"serial": "FDO1234", "nodeId": "101", "name": "leaf101"},
                    {"serial": "FDO5678", "nodeId": "201", "name": "spine201"}
                ]
            }]),
            &mut plan,
        )
        .unwrap();
        assert_eq!(
            classes(&plan),
            ["ctrlrInst", "fabricNodeIdentPol", "fabricNodeIdentP", "fabricNodeIdentP"]
        );
        assert_eq!(plan.ops()[2].attributes["nodeId"], "101");
    }

    #[test]
    fn test_fabric_pod_pgrp_relations() {
        let mut plan = ConstructionPlan::new();
        fabric_pod_pgrp(
            &json!([{
                "name": "pod-pgrp",
                "fabricRsSnmpPol": {"tnSnmpPolName": "default"},
                "fabricRsTimePol": {"tnDatetimePolName": "ntp"}
            }]),
            &mut plan,
        )
        .unwrap();
        assert_eq!(
            classes(&plan),
            ["fabricInst", "fabricFuncP", "fabricPodPGrp", "fabricRsSnmpPol", "fabricRsTimePol"]
        );
    }

    #[test]
    fn test_fabric_pod_p_selectors() {
        let mut plan = ConstructionPlan::new();
        fabric_pod_p(
            &json!([{
                "name": "default",
                "fabricPodS": [{
                    "name": "all-pods",
                    "type": "ALL",
                    "fabricRsPodPGrp": {"tDn": "uni/fabric/funcprof/podpgrp-pod-pgrp"}
                }]
            }]),
            &mut plan,
        )
        .unwrap();
        assert_eq!(
            classes(&plan),
            ["fabricInst", "fabricPodP", "fabricPodS", "fabricRsPodPGrp"]
        );
    }
}
