use clap::ValueEnum;
use serde_json::Value;
use tracing::{debug, info};

use super::tasks::add_templates_to_pbi;
use super::BatchReport;
use crate::catalog::PbiType;
use crate::client::WorkItemClient;
use crate::credentials::Credentials;
use crate::error::{ChoresError, Result};
use crate::model::fields::{self, link};
use crate::model::work_item::{FieldMap, Relation, WorkItem, WorkItemKind};

/// Source fields carried over to the cleanup PBI when they hold a value.
const COPIED_FIELDS: [&str; 4] = [
    fields::FINANCIAL_ENTITY,
    fields::AREA_ID,
    fields::PRODUCT_PREPARATION_ASSIGNED_TO,
    fields::TECHNICAL_PREPARATION_ASSIGNED_TO,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TitleMode {
    /// "<PBI title> - Cleanup"
    FromPbi,
    /// "<feature title>: Cleanup", or the PBI rule when there is no parent feature
    FromFeature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleanupPbiDraft {
    pub fields: FieldMap,
    pub parent_id: Option<u64>,
}

#[derive(Debug)]
pub struct CleanupOutcome {
    pub pbi_id: u64,
    /// Why the new PBI could not be linked back to its source, if it could not.
    pub link_error: Option<ChoresError>,
    pub tasks: BatchReport,
}

impl CleanupOutcome {
    pub fn linked(&self) -> bool {
        self.link_error.is_none()
    }
}

/// Drops a trailing `Current` segment from a `\`-separated iteration path.
pub fn next_iteration(path: &str) -> String {
    let mut segments: Vec<&str> = path.split('\\').collect();
    if segments.last() == Some(&"Current") {
        segments.pop();
    }
    segments.join("\\")
}

fn pbi_cleanup_title(source: &WorkItem) -> String {
    format!("{} - Cleanup", source.title())
}

async fn cleanup_title(
    client: &dyn WorkItemClient,
    source: &WorkItem,
    parent_id: Option<u64>,
    mode: Option<TitleMode>,
) -> Result<String> {
    let title = match (mode, parent_id) {
        (None, _) => String::new(),
        (Some(TitleMode::FromPbi), _) | (Some(TitleMode::FromFeature), None) => {
            pbi_cleanup_title(source)
        }
        (Some(TitleMode::FromFeature), Some(parent)) => {
            let feature = client.get_work_item(parent).await?;
            format!("{}: Cleanup", feature.title())
        }
    };
    Ok(title)
}

/// Builds the cleanup PBI for `source_id` without creating anything.
///
/// Failing to read the source (or its feature) ends the whole operation.
pub async fn derive_cleanup(
    client: &dyn WorkItemClient,
    source_id: u64,
    title_mode: Option<TitleMode>,
) -> Result<CleanupPbiDraft> {
    let source = client.get_work_item(source_id).await?;
    let kind = source.kind();
    if kind != WorkItemKind::Pbi {
        return Err(ChoresError::TypeMismatch {
            id: source_id,
            expected: WorkItemKind::Pbi.to_string(),
            actual: kind.to_string(),
        });
    }

    let parent_id = source.parent_id();
    let mut draft = FieldMap::new();
    draft.insert(
        fields::TITLE.into(),
        cleanup_title(client, &source, parent_id, title_mode).await?.into(),
    );
    draft.insert(fields::STATE.into(), "Approved".into());
    draft.insert(fields::EFFORT.into(), "0".into());
    draft.insert(
        fields::DESCRIPTION.into(),
        format!("Cleanup PBI for PBI {source_id}").into(),
    );
    draft.insert(fields::PRODUCT_PREPARATION_STATE.into(), "Not Required".into());
    draft.insert(fields::TECHNICAL_PREPARATION_STATE.into(), "Not Started".into());
    if let Some(iteration) = source.field_str(fields::ITERATION_PATH) {
        draft.insert(
            fields::ITERATION_PATH.into(),
            Value::String(next_iteration(iteration)),
        );
    }
    for name in COPIED_FIELDS {
        if let Some(value) = source.non_empty_field(name) {
            draft.insert(name.to_string(), value.clone());
        }
    }

    Ok(CleanupPbiDraft {
        fields: draft,
        parent_id,
    })
}

/// Creates the cleanup PBI, links it back to the source and seeds its tasks.
pub async fn create_cleanup_pbi(
    client: &dyn WorkItemClient,
    creds: &Credentials,
    source_id: u64,
    title_mode: Option<TitleMode>,
) -> Result<CleanupOutcome> {
    let draft = derive_cleanup(client, source_id, title_mode).await?;
    let pbi_id = client
        .create_work_item(&WorkItemKind::Pbi, draft.parent_id, &draft.fields)
        .await?;
    info!("PBI {pbi_id} was created successfully");

    let source_url = client.relation_url(source_id);
    let relations = [
        Relation::new(link::RELATED, source_url.clone()),
        Relation::new(link::DEPENDENCY_REVERSE, source_url),
    ];
    let link_error = client.add_relations(pbi_id, &relations).await.err();
    if let Some(e) = &link_error {
        debug!("Could not link PBI {pbi_id} to {source_id}: {e}");
    }

    // Area and iteration for the tasks come from the PBI as the server stored it.
    // The PBI already exists at this point, so a failed read is reported, not returned.
    let tasks = match client.get_work_item(pbi_id).await {
        Ok(pbi) => {
            let templates = PbiType::CleanupTasks.templates();
            add_templates_to_pbi(client, creds, &pbi, &templates).await
        }
        Err(e) => {
            let mut report = BatchReport::default();
            report.record_failure(format!("PBI {pbi_id}"), e);
            report
        }
    };

    Ok(CleanupOutcome {
        pbi_id,
        link_error,
        tasks,
    })
}
