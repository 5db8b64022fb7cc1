pub mod tfs;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::patch::JsonPatch;
use crate::model::work_item::{FieldMap, Relation, WorkItem, WorkItemKind};

/// Remote work item operations the chores are built from.
#[async_trait]
pub trait WorkItemClient: Send + Sync {
    async fn get_work_item(&self, id: u64) -> Result<WorkItem>;

    /// Creates an item, linked under `parent_id` when given. Returns the new id.
    async fn create_work_item(
        &self,
        kind: &WorkItemKind,
        parent_id: Option<u64>,
        fields: &FieldMap,
    ) -> Result<u64>;

    async fn update_work_item(&self, id: u64, patch: &JsonPatch) -> Result<()>;

    async fn add_relations(&self, id: u64, relations: &[Relation]) -> Result<()>;

    /// URL other items use to point at `id` in a relation.
    fn relation_url(&self, id: u64) -> String;
}

#[cfg(test)]
pub mod mock;
