use tracing::{debug, info};

use super::BatchReport;
use crate::client::WorkItemClient;
use crate::config::RemovalConfig;
use crate::credentials::Credentials;
use crate::error::Result;
use crate::model::patch::removal_patch;

#[derive(Debug)]
pub struct PbiRemoval {
    pub tasks: BatchReport,
    pub pbi_removed: bool,
}

/// Marks a task Removed and strips its relations one at a time.
///
/// Each update removes `/relations/0`; the server renumbers the remaining
/// relations after every delete, so `n` updates clear `n` relations. A task
/// with no relations still gets one fields-only update. Returns the number of
/// updates sent.
pub async fn remove_task(
    client: &dyn WorkItemClient,
    creds: &Credentials,
    removal: &RemovalConfig,
    task_id: u64,
) -> Result<usize> {
    let task = client.get_work_item(task_id).await?;
    let relation_count = task.relations.len();

    if relation_count == 0 {
        let patch = removal_patch(&creds.project, &removal.area, 0);
        client.update_work_item(task_id, &patch).await?;
        info!("Task {task_id} was removed successfully");
        return Ok(1);
    }

    let patch = removal_patch(&creds.project, &removal.area, 1);
    for _ in 0..relation_count {
        client.update_work_item(task_id, &patch).await?;
    }
    info!("Task {task_id} was removed successfully");
    Ok(relation_count)
}

/// Removes every child task of a PBI, then the PBI itself.
///
/// Nothing is rolled back. If any task could not be removed the PBI is left
/// in place so the remaining tasks are still reachable from it.
pub async fn remove_pbi_with_tasks(
    client: &dyn WorkItemClient,
    creds: &Credentials,
    removal: &RemovalConfig,
    pbi_id: u64,
) -> Result<PbiRemoval> {
    let pbi = client.get_work_item(pbi_id).await?;

    let mut tasks = BatchReport::default();
    for task_id in pbi.child_ids() {
        match remove_task(client, creds, removal, task_id).await {
            Ok(_) => tasks.record_success(task_id),
            Err(e) => tasks.record_failure(format!("Task {task_id}"), e),
        }
    }

    if !tasks.is_clean() {
        debug!(
            "PBI {pbi_id} was not removed: {} of its tasks failed",
            tasks.failed.len()
        );
        return Ok(PbiRemoval {
            tasks,
            pbi_removed: false,
        });
    }

    let patch = removal_patch(&creds.project, &removal.area, 0);
    client.update_work_item(pbi_id, &patch).await?;
    info!("PBI {pbi_id} was removed successfully");
    Ok(PbiRemoval {
        tasks,
        pbi_removed: true,
    })
}
