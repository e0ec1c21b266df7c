use std::sync::{Arc, Mutex};

use propoto_core::{
    EpochMs, ExportKind, NewProposal, ProposalContent, ProposalId, ProposalRecord, ProposalStatus,
};
use serde_json::{json, Value};

use crate::audit::AuditEntry;
use crate::store::{ProposalStore, StoreError};

/// Clock used for store-assigned timestamps; injectable for tests.
pub type StoreClock = Arc<dyn Fn() -> EpochMs + Send + Sync>;

/// In-process implementation of the store's proposal operations, with the
/// same semantics the hosted functions have: org scoping, store-assigned
/// timestamps and an audit row per mutation. Backs demo mode and tests.
pub struct MemoryStore {
    clock: StoreClock,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    proposals: Vec<ProposalRecord>,
    audit: Vec<AuditEntry>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(|| {
            chrono::Utc::now().timestamp_millis().max(0) as EpochMs
        }))
    }

    pub fn with_clock(clock: StoreClock) -> Self {
        Self {
            clock,
            inner: Mutex::new(Inner::default()),
        }
    }

    fn now(&self) -> EpochMs {
        (self.clock)()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store poisoned")
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(path: &str) -> StoreError {
    StoreError::Rejected {
        path: path.to_string(),
        message: "Proposal not found".to_string(),
    }
}

#[async_trait::async_trait]
impl ProposalStore for MemoryStore {
    async fn list(&self, org_id: &str) -> Result<Vec<ProposalRecord>, StoreError> {
        let inner = self.lock();
        let mut records: Vec<_> = inner
            .proposals
            .iter()
            .filter(|record| record.org_id == org_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn create(&self, org_id: &str, new: &NewProposal) -> Result<ProposalId, StoreError> {
        let timestamp = self.now();
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = ProposalId(format!("prop_{}", inner.next_id));

        inner.proposals.push(ProposalRecord {
            id: id.clone(),
            prospect_name: new.prospect_name.clone(),
            prospect_url: new.prospect_url.clone(),
            pain_points: new.pain_points.clone(),
            content: new.content.clone(),
            presentation_url: new.presentation_url.clone(),
            pdf_url: new.pdf_url.clone(),
            pptx_url: new.pptx_url.clone(),
            status: ProposalStatus::Draft,
            org_id: org_id.to_string(),
            created_at: timestamp,
            updated_at: timestamp,
            views: 0,
            last_viewed_at: None,
        });
        inner.audit.push(AuditEntry::system(
            "proposal.generated",
            json!({
                "proposalId": id,
                "prospectName": new.prospect_name,
                "prospectUrl": new.prospect_url,
                "hasPresentationUrl": new.presentation_url.is_some(),
                "hasPdfUrl": new.pdf_url.is_some(),
                "hasPptxUrl": new.pptx_url.is_some(),
            }),
            org_id,
            timestamp,
        ));
        Ok(id)
    }

    async fn update_content(
        &self,
        org_id: &str,
        id: &ProposalId,
        content: &ProposalContent,
    ) -> Result<(), StoreError> {
        let timestamp = self.now();
        let mut inner = self.lock();
        let record = inner
            .proposals
            .iter_mut()
            .find(|record| record.id == *id && record.org_id == org_id)
            .ok_or_else(|| not_found("proposals:updateContent"))?;
        record.content = content.clone();
        record.updated_at = timestamp;

        inner.audit.push(AuditEntry::system(
            "proposal.updated",
            json!({ "proposalId": id }),
            org_id,
            timestamp,
        ));
        Ok(())
    }

    async fn update_status(
        &self,
        org_id: &str,
        id: &ProposalId,
        status: ProposalStatus,
    ) -> Result<(), StoreError> {
        let timestamp = self.now();
        let mut inner = self.lock();
        let record = inner
            .proposals
            .iter_mut()
            .find(|record| record.id == *id && record.org_id == org_id)
            .ok_or_else(|| not_found("proposals:updateStatus"))?;
        let previous = record.status;
        record.status = status;

        inner.audit.push(AuditEntry::system(
            "proposal.status_updated",
            json!({
                "proposalId": id,
                "previousStatus": previous,
                "newStatus": status,
            }),
            org_id,
            timestamp,
        ));
        Ok(())
    }

    async fn track_export(
        &self,
        org_id: &str,
        id: &ProposalId,
        kind: ExportKind,
    ) -> Result<(), StoreError> {
        let timestamp = self.now();
        let mut inner = self.lock();
        let prospect_name = inner
            .proposals
            .iter()
            .find(|record| record.id == *id)
            .map(|record| record.prospect_name.clone());

        inner.audit.push(AuditEntry::system(
            format!("proposal.exported.{kind}"),
            json!({
                "proposalId": id,
                "prospectName": prospect_name,
                "exportType": kind.as_str(),
            }),
            org_id,
            timestamp,
        ));
        Ok(())
    }

    async fn track_view(&self, id: &ProposalId) -> Result<u64, StoreError> {
        let timestamp = self.now();
        let mut inner = self.lock();
        let Some(record) = inner.proposals.iter_mut().find(|record| record.id == *id) else {
            return Ok(0);
        };
        record.views += 1;
        record.last_viewed_at = Some(timestamp);
        Ok(record.views)
    }

    async fn append_audit(
        &self,
        org_id: &str,
        action: &str,
        details: Value,
    ) -> Result<(), StoreError> {
        let timestamp = self.now();
        self.lock()
            .audit
            .push(AuditEntry::system(action, details, org_id, timestamp));
        Ok(())
    }

    async fn recent_audit(&self, org_id: &str, limit: usize) -> Result<Vec<AuditEntry>, StoreError> {
        let inner = self.lock();
        let mut entries: Vec<_> = inner
            .audit
            .iter()
            .filter(|entry| entry.org_id == org_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(limit);
        Ok(entries)
    }
}
