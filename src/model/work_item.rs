use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::fields::{self, link};

pub type FieldMap = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkItemKind {
    Pbi,
    Task,
    Feature,
    Other(String),
}

impl WorkItemKind {
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "Product Backlog Item" => WorkItemKind::Pbi,
            "Task" => WorkItemKind::Task,
            "Feature" => WorkItemKind::Feature,
            other => WorkItemKind::Other(other.to_string()),
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            WorkItemKind::Pbi => "Product Backlog Item",
            WorkItemKind::Task => "Task",
            WorkItemKind::Feature => "Feature",
            WorkItemKind::Other(name) => name,
        }
    }
}

impl fmt::Display for WorkItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub rel: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Value>,
}

impl Relation {
    pub fn new(rel: &str, url: String) -> Self {
        Self {
            rel: rel.to_string(),
            url,
            attributes: None,
        }
    }

    /// Id of the item the relation points at, taken from the last URL segment.
    pub fn target_id(&self) -> Option<u64> {
        self.url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .and_then(|s| s.parse().ok())
    }
}

/// A work item as returned by the server. The server owns the canonical copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: u64,
    #[serde(default)]
    pub fields: FieldMap,
    #[serde(default)]
    pub relations: Vec<Relation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl WorkItem {
    pub fn kind(&self) -> WorkItemKind {
        WorkItemKind::from_type_name(self.field_str(fields::WORK_ITEM_TYPE).unwrap_or_default())
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|v| v.as_str())
    }

    /// The field value, unless it is absent, null or an empty string.
    pub fn non_empty_field(&self, name: &str) -> Option<&Value> {
        match self.fields.get(name) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(v) => Some(v),
        }
    }

    pub fn title(&self) -> &str {
        self.field_str(fields::TITLE).unwrap_or_default()
    }

    pub fn parent_id(&self) -> Option<u64> {
        self.relations
            .iter()
            .find(|r| r.rel == link::PARENT)
            .and_then(Relation::target_id)
            .or_else(|| self.field(fields::PARENT).and_then(Value::as_u64))
    }

    pub fn child_ids(&self) -> Vec<u64> {
        self.relations
            .iter()
            .filter(|r| r.rel == link::CHILD)
            .filter_map(Relation::target_id)
            .collect()
    }
}

#[cfg(test)]
pub fn make_work_item(id: u64, kind: &str, title: &str) -> WorkItem {
    let mut fields = FieldMap::new();
    fields.insert(fields::WORK_ITEM_TYPE.into(), kind.into());
    fields.insert(fields::TITLE.into(), title.into());
    WorkItem {
        id,
        fields,
        relations: Vec::new(),
        url: None,
    }
}
