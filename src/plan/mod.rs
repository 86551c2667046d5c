//! The construction plan: an ordered, parent-linked forest of
//! managed-object construction operations.
//!
//! Operations reference their parent by [`OpId`], never by embedding, so the
//! plan stays flat, append-only and trivially replayable: iterating in
//! insertion order always visits a parent before its descendants.

pub mod serialize;

use std::collections::BTreeMap;

use serde::Serialize;

/// Stable identity of an operation within its plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OpId(usize);

/// Attribute set of one managed object.
pub type Attributes = BTreeMap<String, String>;

/// One instruction: create an object of `class` with `attributes` under
/// `parent` (`None` = the implicit top-level anchor, `uni`).
#[derive(Debug, Clone, Serialize)]
pub struct ConstructionOp {
    pub id: OpId,
    pub parent: Option<OpId>,
    pub class: &'static str,
    pub attributes: Attributes,
}

/// Append-only collection of construction operations, shared across every
/// template of one deploy run.
#[derive(Debug, Default)]
pub struct ConstructionPlan {
    ops: Vec<ConstructionOp>,
}

impl ConstructionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[ConstructionOp] {
        &self.ops
    }

    pub fn op(&self, id: OpId) -> &ConstructionOp {
        &self.ops[id.0]
    }

    /// Append an operation directly under the top-level anchor.
    pub fn push_root(&mut self, class: &'static str, attributes: Attributes) -> OpId {
        self.push(None, class, attributes)
    }

    /// Append an operation under an existing one.
    pub fn push_child(
        &mut self,
        parent: OpId,
        class: &'static str,
        attributes: Attributes,
    ) -> OpId {
        self.push(Some(parent), class, attributes)
    }

    fn push(
        &mut self,
        parent: Option<OpId>,
        class: &'static str,
        attributes: Attributes,
    ) -> OpId {
        let id = OpId(self.ops.len());
        self.ops.push(ConstructionOp {
            id,
            parent,
            class,
            attributes,
        });
        id
    }

    /// Ids of the direct children of `parent` in insertion order.
    pub(crate) fn children_of(&self, parent: Option<OpId>) -> impl Iterator<Item = &ConstructionOp> {
        self.ops.iter().filter(move |op| op.parent == parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_insertion_order_is_parent_before_child() {
        let mut plan = ConstructionPlan::new();
        let tenant = plan.push_root("fvTenant", attrs(&[("name", "PROD")]));
        let ap = plan.push_child(tenant, "fvAp", attrs(&[("name", "web")]));
        plan.push_child(ap, "fvAEPg", attrs(&[("name", "frontend")]));

        for op in plan.ops() {
            if let Some(parent) = op.parent {
                assert!(plan.op(parent).id.0 < op.id.0);
            }
        }
    }

    #[test]
    fn test_children_of_filters_by_parent() {
        let mut plan = ConstructionPlan::new();
        let a = plan.push_root("fvTenant", attrs(&[("name", "A")]));
        plan.push_root("fvTenant", attrs(&[("name", "B")]));
        plan.push_child(a, "fvAp", attrs(&[("name", "ap1")]));

        assert_eq!(plan.children_of(None).count(), 2);
        assert_eq!(plan.children_of(Some(a)).count(), 1);
    }

    #[test]
    fn test_plan_is_append_only() {
        let mut plan = ConstructionPlan::new();
        assert!(plan.is_empty());
        plan.push_root("fvTenant", attrs(&[("name", "A")]));
        plan.push_root("fvTenant", attrs(&[("name", "B")]));
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.ops()[0].attributes["name"], "A");
    }
}
