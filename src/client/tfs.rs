use async_trait::async_trait;
use base64::Engine;
use std::time::Duration;
use tracing::debug;

use super::WorkItemClient;
use crate::config::ServerConfig;
use crate::credentials::Credentials;
use crate::error::{ChoresError, Result};
use crate::model::fields::link;
use crate::model::patch::{fields_patch, JsonPatch, PatchOperation};
use crate::model::work_item::{FieldMap, Relation, WorkItem, WorkItemKind};

const JSON_PATCH: &str = "application/json-patch+json";

/// Work item tracking REST client for TFS / Azure DevOps.
pub struct TfsClient {
    project_url: String,
    relation_base: String,
    api_version: String,
    auth_header: String,
    client: reqwest::Client,
}

impl TfsClient {
    pub fn new(creds: &Credentials, server: &ServerConfig) -> Result<Self> {
        let base = if creds.base_uri.ends_with('/') {
            creds.base_uri.clone()
        } else {
            format!("{}/", creds.base_uri)
        };
        let project_url = format!("{base}{}", urlencoding::encode(&creds.project));
        let relation_base = server
            .relation_base
            .clone()
            .unwrap_or_else(|| format!("{project_url}/_apis/wit/workItems/"));

        let login = format!("{}:{}", creds.username, creds.password);
        let encoded = base64::engine::general_purpose::STANDARD.encode(login);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(server.timeout_secs))
            .build()?;

        Ok(Self {
            project_url,
            relation_base,
            api_version: server.api_version.clone(),
            auth_header: format!("Basic {encoded}"),
            client,
        })
    }

    fn item_url(&self, id: u64) -> String {
        format!(
            "{}/_apis/wit/workitems/{id}?api-version={}",
            self.project_url, self.api_version
        )
    }

    async fn send_patch(
        &self,
        url: &str,
        method: reqwest::Method,
        patch: &JsonPatch,
    ) -> Result<WorkItem> {
        debug!("{method} {url} ({} operations)", patch.len());
        let body = serde_json::to_vec(patch).map_err(|e| ChoresError::Transport(e.to_string()))?;
        let resp = self
            .client
            .request(method, url)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", JSON_PATCH)
            .header("Accept", "application/json")
            .body(body)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        Ok(resp.json().await?)
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let url = resp.url().to_string();
    let body = resp.text().await.unwrap_or_default();
    let message: String = body.chars().take(300).collect();
    Err(ChoresError::Transport(format!("{status} for {url}: {message}")))
}

#[async_trait]
impl WorkItemClient for TfsClient {
    async fn get_work_item(&self, id: u64) -> Result<WorkItem> {
        let url = format!("{}&$expand=relations", self.item_url(id));
        debug!("GET {url}");
        let resp = self
            .client
            .get(&url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .send()
            .await?;
        let resp = check_status(resp).await?;
        Ok(resp.json().await?)
    }

    async fn create_work_item(
        &self,
        kind: &WorkItemKind,
        parent_id: Option<u64>,
        fields: &FieldMap,
    ) -> Result<u64> {
        let url = format!(
            "{}/_apis/wit/workitems/${}?api-version={}",
            self.project_url,
            urlencoding::encode(kind.type_name()),
            self.api_version
        );
        let mut patch = fields_patch(fields);
        if let Some(parent) = parent_id {
            let relation = Relation::new(link::PARENT, self.relation_url(parent));
            patch.push(PatchOperation::add_relation(&relation));
        }
        let created = self.send_patch(&url, reqwest::Method::POST, &patch).await?;
        Ok(created.id)
    }

    async fn update_work_item(&self, id: u64, patch: &JsonPatch) -> Result<()> {
        self.send_patch(&self.item_url(id), reqwest::Method::PATCH, patch)
            .await?;
        Ok(())
    }

    async fn add_relations(&self, id: u64, relations: &[Relation]) -> Result<()> {
        let patch: JsonPatch = relations.iter().map(PatchOperation::add_relation).collect();
        self.update_work_item(id, &patch).await
    }

    fn relation_url(&self, id: u64) -> String {
        format!("{}{id}", self.relation_base)
    }
}
