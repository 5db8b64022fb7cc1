use serde::Serialize;
use serde_json::Value;

use super::fields;
use super::work_item::{FieldMap, Relation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Remove,
}

/// One JSON-patch operation, as accepted by the work item endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

pub type JsonPatch = Vec<PatchOperation>;

impl PatchOperation {
    pub fn set_field(name: &str, value: Value) -> Self {
        Self {
            op: PatchOp::Add,
            path: format!("/fields/{name}"),
            value: Some(value),
        }
    }

    pub fn add_relation(relation: &Relation) -> Self {
        Self {
            op: PatchOp::Add,
            path: "/relations/-".into(),
            value: serde_json::to_value(relation).ok(),
        }
    }

    pub fn remove_relation(index: usize) -> Self {
        Self {
            op: PatchOp::Remove,
            path: format!("/relations/{index}"),
            value: None,
        }
    }
}

pub fn fields_patch(fields: &FieldMap) -> JsonPatch {
    fields
        .iter()
        .map(|(name, value)| PatchOperation::set_field(name, value.clone()))
        .collect()
}

/// Patch that marks an item Removed, moves it to `<project>\<area>` and strips
/// relations `0..relation_count`.
pub fn removal_patch(project: &str, area: &str, relation_count: usize) -> JsonPatch {
    let removed_path = format!("{project}\\{area}");
    let mut patch = vec![
        PatchOperation::set_field(fields::STATE, "Removed".into()),
        PatchOperation::set_field(fields::AREA_PATH, removed_path.clone().into()),
        PatchOperation::set_field(fields::ITERATION_PATH, removed_path.into()),
    ];
    patch.extend((0..relation_count).map(PatchOperation::remove_relation));
    patch
}
