use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::WorkItemClient;
use crate::error::{ChoresError, Result};
use crate::model::fields::{self, link};
use crate::model::patch::{JsonPatch, PatchOp};
use crate::model::work_item::{FieldMap, Relation, WorkItem, WorkItemKind};

pub const RELATION_BASE: &str = "https://tfs.test/_apis/wit/workItems/";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get(u64),
    Create {
        kind: WorkItemKind,
        parent_id: Option<u64>,
        fields: FieldMap,
    },
    Update {
        id: u64,
        patch: JsonPatch,
    },
    AddRelations {
        id: u64,
        relations: Vec<Relation>,
    },
}

/// In-memory tracker that records every call and can be told to fail.
pub struct MockClient {
    items: Mutex<HashMap<u64, WorkItem>>,
    calls: Mutex<Vec<Call>>,
    next_id: Mutex<u64>,
    failing_gets: HashSet<u64>,
    failing_updates: HashSet<u64>,
    failing_titles: HashSet<String>,
    fail_relations: bool,
}

impl MockClient {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            next_id: Mutex::new(1000),
            failing_gets: HashSet::new(),
            failing_updates: HashSet::new(),
            failing_titles: HashSet::new(),
            fail_relations: false,
        }
    }

    pub fn with_item(self, item: WorkItem) -> Self {
        self.items.lock().unwrap().insert(item.id, item);
        self
    }

    pub fn failing_get(mut self, id: u64) -> Self {
        self.failing_gets.insert(id);
        self
    }

    pub fn failing_update(mut self, id: u64) -> Self {
        self.failing_updates.insert(id);
        self
    }

    /// Creating an item with this title fails.
    pub fn failing_create(mut self, title: &str) -> Self {
        self.failing_titles.insert(title.to_string());
        self
    }

    pub fn failing_relations(mut self) -> Self {
        self.fail_relations = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn creates(&self) -> Vec<(WorkItemKind, Option<u64>, FieldMap)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Create {
                    kind,
                    parent_id,
                    fields,
                } => Some((kind, parent_id, fields)),
                _ => None,
            })
            .collect()
    }

    pub fn updates(&self) -> Vec<(u64, JsonPatch)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Update { id, patch } => Some((id, patch)),
                _ => None,
            })
            .collect()
    }

    pub fn item(&self, id: u64) -> Option<WorkItem> {
        self.items.lock().unwrap().get(&id).cloned()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

/// Relation pointing at item `to`.
pub fn relation(rel: &str, to: u64) -> Relation {
    Relation::new(rel, format!("{RELATION_BASE}{to}"))
}

pub fn with_children(mut item: WorkItem, children: &[u64]) -> WorkItem {
    item.relations
        .extend(children.iter().map(|id| relation(link::CHILD, *id)));
    item
}

#[async_trait]
impl WorkItemClient for MockClient {
    async fn get_work_item(&self, id: u64) -> Result<WorkItem> {
        self.record(Call::Get(id));
        if self.failing_gets.contains(&id) {
            return Err(ChoresError::Transport(format!("500 for item {id}")));
        }
        self.item(id)
            .ok_or_else(|| ChoresError::Transport(format!("404 for item {id}")))
    }

    async fn create_work_item(
        &self,
        kind: &WorkItemKind,
        parent_id: Option<u64>,
        fields: &FieldMap,
    ) -> Result<u64> {
        self.record(Call::Create {
            kind: kind.clone(),
            parent_id,
            fields: fields.clone(),
        });
        let title = fields
            .get(fields::TITLE)
            .and_then(Value::as_str)
            .unwrap_or_default();
        if self.failing_titles.contains(title) {
            return Err(ChoresError::Transport(format!("400 creating '{title}'")));
        }

        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            *next
        };
        let mut stored = fields.clone();
        stored.insert(fields::WORK_ITEM_TYPE.into(), kind.type_name().into());
        let mut relations = Vec::new();
        if let Some(parent) = parent_id {
            relations.push(relation(link::PARENT, parent));
        }
        self.items.lock().unwrap().insert(
            id,
            WorkItem {
                id,
                fields: stored,
                relations,
                url: None,
            },
        );
        Ok(id)
    }

    async fn update_work_item(&self, id: u64, patch: &JsonPatch) -> Result<()> {
        self.record(Call::Update {
            id,
            patch: patch.clone(),
        });
        if self.failing_updates.contains(&id) {
            return Err(ChoresError::Transport(format!("500 updating {id}")));
        }

        let mut items = self.items.lock().unwrap();
        let item = items
            .get_mut(&id)
            .ok_or_else(|| ChoresError::Transport(format!("404 for item {id}")))?;
        for op in patch {
            match (op.op, op.path.strip_prefix("/fields/"), op.path.strip_prefix("/relations/")) {
                (PatchOp::Add, Some(name), _) => {
                    item.fields
                        .insert(name.to_string(), op.value.clone().unwrap_or(Value::Null));
                }
                (PatchOp::Remove, _, Some(index)) => {
                    let index: usize = index
                        .parse()
                        .map_err(|_| ChoresError::Transport(format!("bad path {}", op.path)))?;
                    if index >= item.relations.len() {
                        return Err(ChoresError::Transport(format!(
                            "relation index {index} out of range"
                        )));
                    }
                    item.relations.remove(index);
                }
                (PatchOp::Add, _, Some("-")) => {
                    if let Some(value) = &op.value {
                        let rel: Relation = serde_json::from_value(value.clone())
                            .map_err(|e| ChoresError::Transport(e.to_string()))?;
                        item.relations.push(rel);
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    async fn add_relations(&self, id: u64, relations: &[Relation]) -> Result<()> {
        self.record(Call::AddRelations {
            id,
            relations: relations.to_vec(),
        });
        if self.fail_relations {
            return Err(ChoresError::Transport(format!("500 linking {id}")));
        }
        if let Some(item) = self.items.lock().unwrap().get_mut(&id) {
            item.relations.extend_from_slice(relations);
        }
        Ok(())
    }

    fn relation_url(&self, id: u64) -> String {
        format!("{RELATION_BASE}{id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::patch::removal_patch;
    use crate::model::work_item::make_work_item;

    #[tokio::test]
    async fn create_then_get() {
        let client = MockClient::new();
        let mut fields = FieldMap::new();
        fields.insert(fields::TITLE.into(), "New".into());

        let id = client
            .create_work_item(&WorkItemKind::Task, Some(5), &fields)
            .await
            .unwrap();
        let item = client.get_work_item(id).await.unwrap();
        assert_eq!(item.kind(), WorkItemKind::Task);
        assert_eq!(item.parent_id(), Some(5));
    }

    #[tokio::test]
    async fn removing_relation_zero_reindexes() {
        let mut task = make_work_item(1, "Task", "t");
        task.relations = vec![relation(link::PARENT, 10), relation(link::RELATED, 11)];
        let client = MockClient::new().with_item(task);

        client
            .update_work_item(1, &removal_patch("p", "Optimizers", 1))
            .await
            .unwrap();
        let item = client.item(1).unwrap();
        assert_eq!(item.relations.len(), 1);
        assert_eq!(item.relations[0].target_id(), Some(11));
        assert_eq!(item.field_str(fields::STATE), Some("Removed"));
    }

    #[tokio::test]
    async fn failures_are_transport_errors() {
        let client = MockClient::new().failing_get(3);
        let err = client.get_work_item(3).await.unwrap_err();
        assert!(matches!(err, ChoresError::Transport(_)));
        assert_eq!(client.calls(), vec![Call::Get(3)]);
    }
}
