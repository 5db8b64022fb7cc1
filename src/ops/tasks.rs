use tracing::info;

use super::BatchReport;
use crate::catalog::{PbiType, TaskTemplate};
use crate::client::WorkItemClient;
use crate::credentials::Credentials;
use crate::error::{ChoresError, Result};
use crate::model::fields;
use crate::model::work_item::{FieldMap, WorkItem, WorkItemKind};

/// Fields copied verbatim from the source task when present.
const COPIED_TASK_FIELDS: [&str; 4] = [
    fields::TITLE,
    fields::BACKLOG_PRIORITY,
    fields::ACTIVITY,
    fields::DESCRIPTION,
];

/// Area and iteration a new task takes over from its PBI.
fn inherit_placement(task: &mut FieldMap, pbi: &WorkItem) {
    for name in [fields::AREA_ID, fields::ITERATION_ID] {
        if let Some(value) = pbi.field(name) {
            task.insert(name.to_string(), value.clone());
        }
    }
}

/// Field map for a copy of `source_task` placed under `target_pbi`.
pub fn copied_task_fields(source_task: &WorkItem, target_pbi: &WorkItem) -> Result<FieldMap> {
    let kind = source_task.kind();
    if kind != WorkItemKind::Task {
        return Err(ChoresError::TypeMismatch {
            id: source_task.id,
            expected: WorkItemKind::Task.to_string(),
            actual: kind.to_string(),
        });
    }

    let mut task = FieldMap::new();
    task.insert(fields::STATE.into(), "To Do".into());
    inherit_placement(&mut task, target_pbi);
    for name in COPIED_TASK_FIELDS {
        if let Some(value) = source_task.field(name) {
            task.insert(name.to_string(), value.clone());
        }
    }
    Ok(task)
}

pub async fn copy_task(
    client: &dyn WorkItemClient,
    source_task: &WorkItem,
    target_pbi: &WorkItem,
) -> Result<u64> {
    let fields = copied_task_fields(source_task, target_pbi)?;
    let id = client
        .create_work_item(&WorkItemKind::Task, Some(target_pbi.id), &fields)
        .await?;
    info!("Task {id} was copied to PBI {} successfully", target_pbi.id);
    Ok(id)
}

pub async fn add_task_to_pbi(
    client: &dyn WorkItemClient,
    mut task: FieldMap,
    pbi: &WorkItem,
) -> Result<u64> {
    inherit_placement(&mut task, pbi);
    let id = client
        .create_work_item(&WorkItemKind::Task, Some(pbi.id), &task)
        .await?;
    info!("Task {id} was added successfully");
    Ok(id)
}

/// Creates one task per template under `pbi`, continuing past failures.
pub async fn add_templates_to_pbi(
    client: &dyn WorkItemClient,
    creds: &Credentials,
    pbi: &WorkItem,
    templates: &[TaskTemplate],
) -> BatchReport {
    let mut report = BatchReport::default();
    for template in templates {
        match add_task_to_pbi(client, template.to_fields(creds), pbi).await {
            Ok(id) => report.record_success(id),
            Err(e) => report.record_failure(format!("Task '{}'", template.title), e),
        }
    }
    report
}

pub async fn add_tasks_to_pbi(
    client: &dyn WorkItemClient,
    creds: &Credentials,
    pbi_id: u64,
    pbi_type: PbiType,
) -> Result<BatchReport> {
    let pbi = client.get_work_item(pbi_id).await?;
    Ok(add_templates_to_pbi(client, creds, &pbi, &pbi_type.templates()).await)
}

/// Copies every child task of `source_id` under `target_id`.
pub async fn clone_pbi_tasks(
    client: &dyn WorkItemClient,
    source_id: u64,
    target_id: u64,
) -> Result<BatchReport> {
    let source = client.get_work_item(source_id).await?;
    let target = client.get_work_item(target_id).await?;

    let mut report = BatchReport::default();
    for task_id in source.child_ids() {
        let copied = match client.get_work_item(task_id).await {
            Ok(task) => copy_task(client, &task, &target).await,
            Err(e) => Err(e),
        };
        match copied {
            Ok(id) => report.record_success(id),
            Err(e) => report.record_failure(format!("Task {task_id}"), e),
        }
    }
    Ok(report)
}
