use std::time::Duration;

use propoto_core::{ExportKind, NewProposal, ProposalContent, ProposalId, ProposalRecord, ProposalStatus};
use serde_json::{json, Value};
use thiserror::Error;

use crate::audit::AuditEntry;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store http status {status}: {message}")]
    Http { status: u16, message: String },
    #[error("store rejected {path}: {message}")]
    Rejected { path: String, message: String },
    #[error("store network error: {0}")]
    Network(String),
    #[error("invalid store payload: {0}")]
    Payload(String),
}

/// The document store's proposal operations. Mutation completions carry no
/// data the caller is allowed to act on besides the created id; state changes
/// become visible through the next `list`.
#[async_trait::async_trait]
pub trait ProposalStore: Send + Sync {
    /// Current proposals of the organization, newest first.
    async fn list(&self, org_id: &str) -> Result<Vec<ProposalRecord>, StoreError>;
    async fn create(&self, org_id: &str, new: &NewProposal) -> Result<ProposalId, StoreError>;
    async fn update_content(
        &self,
        org_id: &str,
        id: &ProposalId,
        content: &ProposalContent,
    ) -> Result<(), StoreError>;
    async fn update_status(
        &self,
        org_id: &str,
        id: &ProposalId,
        status: ProposalStatus,
    ) -> Result<(), StoreError>;
    async fn track_export(
        &self,
        org_id: &str,
        id: &ProposalId,
        kind: ExportKind,
    ) -> Result<(), StoreError>;
    /// Bumps the view counter; returns the new count.
    async fn track_view(&self, id: &ProposalId) -> Result<u64, StoreError>;
    async fn append_audit(
        &self,
        org_id: &str,
        action: &str,
        details: Value,
    ) -> Result<(), StoreError>;
    async fn recent_audit(&self, org_id: &str, limit: usize) -> Result<Vec<AuditEntry>, StoreError>;
}

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub deployment_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl StoreSettings {
    pub fn new(deployment_url: impl Into<String>) -> Self {
        Self {
            deployment_url: deployment_url.into(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Client for the store's HTTP function API: named functions invoked through
/// `POST /api/query` and `POST /api/mutation` with a `{path, args}` envelope.
#[derive(Debug, Clone)]
pub struct HttpProposalStore {
    settings: StoreSettings,
}

impl HttpProposalStore {
    pub fn new(settings: StoreSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, StoreError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| StoreError::Network(err.to_string()))
    }

    async fn call(&self, endpoint: &str, path: &str, args: Value) -> Result<Value, StoreError> {
        let client = self.build_client()?;
        let url = format!(
            "{}/api/{endpoint}",
            self.settings.deployment_url.trim_end_matches('/')
        );
        let response = client
            .post(url)
            .json(&json!({ "path": path, "args": args, "format": "json" }))
            .send()
            .await
            .map_err(|err| StoreError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Http {
                status: status.as_u16(),
                message: status.to_string(),
            });
        }

        let envelope: Value = response
            .json()
            .await
            .map_err(|err| StoreError::Payload(err.to_string()))?;
        match envelope.get("status").and_then(Value::as_str) {
            Some("success") => Ok(envelope.get("value").cloned().unwrap_or(Value::Null)),
            _ => Err(StoreError::Rejected {
                path: path.to_string(),
                message: envelope
                    .get("errorMessage")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown store error")
                    .to_string(),
            }),
        }
    }

    async fn query(&self, path: &str, args: Value) -> Result<Value, StoreError> {
        self.call("query", path, args).await
    }

    async fn mutation(&self, path: &str, args: Value) -> Result<Value, StoreError> {
        self.call("mutation", path, args).await
    }
}

#[async_trait::async_trait]
impl ProposalStore for HttpProposalStore {
    async fn list(&self, org_id: &str) -> Result<Vec<ProposalRecord>, StoreError> {
        let value = self
            .query("proposals:list", json!({ "orgId": org_id }))
            .await?;
        serde_json::from_value(value).map_err(|err| StoreError::Payload(err.to_string()))
    }

    async fn create(&self, org_id: &str, new: &NewProposal) -> Result<ProposalId, StoreError> {
        let mut args =
            serde_json::to_value(new).map_err(|err| StoreError::Payload(err.to_string()))?;
        if let Some(fields) = args.as_object_mut() {
            fields.insert("orgId".to_string(), json!(org_id));
            fields.insert("status".to_string(), json!(ProposalStatus::Draft));
        }
        let value = self.mutation("proposals:create", args).await?;
        value
            .get("id")
            .and_then(Value::as_str)
            .map(ProposalId::from)
            .ok_or_else(|| StoreError::Payload("create returned no id".to_string()))
    }

    async fn update_content(
        &self,
        org_id: &str,
        id: &ProposalId,
        content: &ProposalContent,
    ) -> Result<(), StoreError> {
        self.mutation(
            "proposals:updateContent",
            json!({ "id": id, "content": content, "orgId": org_id }),
        )
        .await?;
        Ok(())
    }

    async fn update_status(
        &self,
        org_id: &str,
        id: &ProposalId,
        status: ProposalStatus,
    ) -> Result<(), StoreError> {
        self.mutation(
            "proposals:updateStatus",
            json!({ "id": id, "status": status, "orgId": org_id }),
        )
        .await?;
        Ok(())
    }

    async fn track_export(
        &self,
        org_id: &str,
        id: &ProposalId,
        kind: ExportKind,
    ) -> Result<(), StoreError> {
        self.mutation(
            "proposals:trackExport",
            json!({ "proposalId": id, "exportType": kind.as_str(), "orgId": org_id }),
        )
        .await?;
        Ok(())
    }

    async fn track_view(&self, id: &ProposalId) -> Result<u64, StoreError> {
        let value = self
            .mutation("proposals:trackView", json!({ "id": id }))
            .await?;
        Ok(value.get("views").and_then(Value::as_u64).unwrap_or(0))
    }

    async fn append_audit(
        &self,
        org_id: &str,
        action: &str,
        details: Value,
    ) -> Result<(), StoreError> {
        self.mutation(
            "auditLogs:log",
            json!({ "action": action, "details": details, "orgId": org_id }),
        )
        .await?;
        Ok(())
    }

    async fn recent_audit(&self, org_id: &str, limit: usize) -> Result<Vec<AuditEntry>, StoreError> {
        let value = self
            .query("auditLogs:list", json!({ "orgId": org_id, "limit": limit }))
            .await?;
        serde_json::from_value(value).map_err(|err| StoreError::Payload(err.to_string()))
    }
}
