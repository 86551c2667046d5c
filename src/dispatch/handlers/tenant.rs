//! Tenant-scope handlers: tenants, application profiles, EPGs, networking
//! and address pools.
//!
//! Each handler mirrors one branch of the controller's managed-object
//! hierarchy. Parent-locator fields (`tenant`, `fvApName`, ...) establish
//! the chain of containing objects and are excluded from the attribute set
//! of the object itself.

use serde_json::Value;

use super::{child_if_valid, children_if_valid, named, HandlerError};
use crate::dispatch::validity::required_present;
use crate::dispatch::value::{items, object, scalar_attrs, str_field};
use crate::plan::ConstructionPlan;

/// Tenants > All Tenants
pub fn fv_tenant(value: &Value, plan: &mut ConstructionPlan) -> Result<(), HandlerError> {
    for item in items(value)? {
        let item = object(item)?;
        plan.push_root("fvTenant", scalar_attrs(item, &[]));
    }
    Ok(())
}

/// Tenants > Application Profiles
pub fn fv_ap(value: &Value, plan: &mut ConstructionPlan) -> Result<(), HandlerError> {
    for item in items(value)? {
        let item = object(item)?;
        if !required_present(item, &["name", "tenant"]) {
            continue;
        }
        let tenant = plan.push_root("fvTenant", named(str_field(item, "tenant")?));
        plan.push_child(tenant, "fvAp", scalar_attrs(item, &["tenant"]));
    }
    Ok(())
}

/// Tenants > Application Profiles > Application EPGs
pub fn fv_aepg(value: &Value, plan: &mut ConstructionPlan) -> Result<(), HandlerError> {
    for item in items(value)? {
        let item = object(item)?;
        let tenant = plan.push_root("fvTenant", named(str_field(item, "tenant")?));
        let ap = plan.push_child(tenant, "fvAp", named(str_field(item, "fvApName")?));
        let epg = plan.push_child(
            ap,
            "fvAEPg",
            scalar_attrs(item, &["tenant", "fvApName"]),
        );
        child_if_valid(plan, epg, item, "fvRsBd", &["tnFvBDName"])?;
        children_if_valid(plan, epg, item, "fvRsDomAtt", &["tDn"])?;
        children_if_valid(plan, epg, item, "fvRsPathAtt", &["tDn", "primaryEncap", "mode"])?;
    }
    Ok(())
}

/// Tenants > Networking > Bridge Domains
pub fn fv_bd(value: &Value, plan: &mut ConstructionPlan) -> Result<(), HandlerError> {
    for item in items(value)? {
        let item = object(item)?;
        let tenant = plan.push_root("fvTenant", named(str_field(item, "tenant")?));
        let bd = plan.push_child(tenant, "fvBD", scalar_attrs(item, &["tenant"]));
        child_if_valid(plan, bd, item, "fvRsCtx", &["tnFvCtxName"])?;
        child_if_valid(plan, bd, item, "igmpIfP", &["name"])?;
        child_if_valid(plan, bd, item, "fvRsBdToEpRet", &["tnFvEpRetPolName"])?;
        child_if_valid(plan, bd, item, "fvRsIgmpsn", &["tnIgmpSnoopPolName"])?;
        child_if_valid(plan, bd, item, "fvRsMldsn", &["tnMldSnoopPolName"])?;
        child_if_valid(plan, bd, item, "fvRsBDToOut", &["tnL3extOutName"])?;
        children_if_valid(plan, bd, item, "fvSubnet", &["ip"])?;
    }
    Ok(())
}

/// Tenants > Networking > VRFs
pub fn fv_ctx(value: &Value, plan: &mut ConstructionPlan) -> Result<(), HandlerError> {
    for item in items(value)? {
        let item = object(item)?;
        let tenant = plan.push_root("fvTenant", named(str_field(item, "tenant")?));
        let ctx = plan.push_child(tenant, "fvCtx", scalar_attrs(item, &["tenant"]));
        if let Some(any) = item.get("vzAny") {
            let any = object(any)?;
            let any_id = plan.push_child(ctx, "vzAny", scalar_attrs(any, &[]));
            children_if_valid(plan, any_id, any, "vzRsAnyToProv", &["tnVzBrCPName"])?;
            children_if_valid(plan, any_id, any, "vzRsAnyToCons", &["tnVzBrCPName"])?;
        }
        child_if_valid(plan, ctx, item, "fvRsCtxToEpRet", &["tnFvEpRetPolName"])?;
        child_if_valid(plan, ctx, item, "fvRsOspfCtxPol", &["tnOspfCtxPolName"])?;
        child_if_valid(plan, ctx, item, "fvRsBgpCtxPol", &["tnBgpCtxPolName"])?;
        child_if_valid(plan, ctx, item, "pimCtxP", &["mtu"])?;
    }
    Ok(())
}

/// Tenants > Application Profiles > Application EPGs > Static Ports.
/// Each row names its full containing chain and is gated as a whole.
pub fn fv_rs_path_att(value: &Value, plan: &mut ConstructionPlan) -> Result<(), HandlerError> {
    const REQUIRED: &[&str] = &["tenant", "fvApName", "fvAEPgName", "tDn", "primaryEncap", "mode"];
    for item in items(value)? {
        let item = object(item)?;
        if !required_present(item, REQUIRED) {
            continue;
        }
        let tenant = plan.push_root("fvTenant", named(str_field(item, "tenant")?));
        let ap = plan.push_child(tenant, "fvAp", named(str_field(item, "fvApName")?));
        let epg = plan.push_child(ap, "fvAEPg", named(str_field(item, "fvAEPgName")?));
        plan.push_child(
            epg,
            "fvRsPathAtt",
            scalar_attrs(item, &["tenant", "fvApName", "fvAEPgName"]),
        );
    }
    Ok(())
}

/// Tenants > mgmt > IP Address Pools
pub fn fvns_addr_inst(value: &Value, plan: &mut ConstructionPlan) -> Result<(), HandlerError> {
    for item in items(value)? {
        let item = object(item)?;
        let tenant = plan.push_root("fvTenant", named(str_field(item, "tenant")?));
        let pool = plan.push_child(tenant, "fvnsAddrInst", scalar_attrs(item, &["tenant"]));
        children_if_valid(plan, pool, item, "fvnsUcastAddrBlk", &["from"])?;
    }
    Ok(())
}
