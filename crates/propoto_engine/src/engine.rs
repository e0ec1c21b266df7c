use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use propoto_core::{
    ExportKind, GenerateRequest, NewProposal, ProposalContent, ProposalId, ProposalRecord,
    ProposalStatus,
};
use propoto_logging::{propoto_info, propoto_warn};

use crate::agent::{AgentClient, AgentSettings, ReqwestAgentClient};
use crate::memory::MemoryStore;
use crate::store::{HttpProposalStore, ProposalStore, StoreSettings};
use crate::types::{EngineEvent, ModelsCatalog, TemplatesCatalog};

/// Model key assumed when the service does not announce a default.
const DEFAULT_MODEL_KEY: &str = "grok";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub agent: AgentSettings,
    /// `None` runs against the in-process demo store.
    pub store: Option<StoreSettings>,
    pub org_id: String,
    pub poll_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            agent: AgentSettings::default(),
            store: None,
            org_id: "demo-org-1".to_string(),
            poll_interval: Duration::from_millis(1500),
        }
    }
}

enum EngineCommand {
    Generate {
        seq: u64,
        request: GenerateRequest,
    },
    Persist(NewProposal),
    UpdateContent {
        id: ProposalId,
        content: ProposalContent,
    },
    UpdateStatus {
        id: ProposalId,
        status: ProposalStatus,
    },
    TrackExport {
        id: ProposalId,
        kind: ExportKind,
    },
    RefreshCatalogs,
}

/// Command side of the engine. The paired event receiver delivers snapshots,
/// generation completions and catalog fetches.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> (Self, mpsc::Receiver<EngineEvent>) {
        let store: Arc<dyn ProposalStore> = match &config.store {
            Some(settings) => Arc::new(HttpProposalStore::new(settings.clone())),
            None => Arc::new(MemoryStore::new()),
        };
        Self::with_store(config, store)
    }

    /// Runs the engine over an explicit store implementation.
    pub fn with_store(
        config: EngineConfig,
        store: Arc<dyn ProposalStore>,
    ) -> (Self, mpsc::Receiver<EngineEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let agent: Arc<dyn AgentClient> = Arc::new(ReqwestAgentClient::new(config.agent.clone()));
        let org_id = config.org_id.clone();
        let poll_interval = config.poll_interval;

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            runtime.spawn(subscription_loop(
                store.clone(),
                org_id.clone(),
                poll_interval,
                event_tx.clone(),
            ));
            while let Ok(command) = cmd_rx.recv() {
                let agent = agent.clone();
                let store = store.clone();
                let event_tx = event_tx.clone();
                let org_id = org_id.clone();
                runtime.spawn(async move {
                    handle_command(agent, store, org_id, command, event_tx).await;
                });
            }
        });

        (Self { cmd_tx }, event_rx)
    }

    pub fn generate(&self, seq: u64, request: GenerateRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Generate { seq, request });
    }

    pub fn persist(&self, new: NewProposal) {
        let _ = self.cmd_tx.send(EngineCommand::Persist(new));
    }

    pub fn update_content(&self, id: ProposalId, content: ProposalContent) {
        let _ = self.cmd_tx.send(EngineCommand::UpdateContent { id, content });
    }

    pub fn update_status(&self, id: ProposalId, status: ProposalStatus) {
        let _ = self.cmd_tx.send(EngineCommand::UpdateStatus { id, status });
    }

    pub fn track_export(&self, id: ProposalId, kind: ExportKind) {
        let _ = self.cmd_tx.send(EngineCommand::TrackExport { id, kind });
    }

    pub fn refresh_catalogs(&self) {
        let _ = self.cmd_tx.send(EngineCommand::RefreshCatalogs);
    }
}

/// Polls the store and emits a snapshot whenever the collection changed.
/// This stands in for a live query; delivery is always the full list.
async fn subscription_loop(
    store: Arc<dyn ProposalStore>,
    org_id: String,
    interval: Duration,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let mut last: Option<Vec<ProposalRecord>> = None;
    loop {
        match store.list(&org_id).await {
            Ok(records) => {
                if last.as_ref() != Some(&records) {
                    if event_tx.send(EngineEvent::Snapshot(records.clone())).is_err() {
                        return;
                    }
                    last = Some(records);
                }
            }
            // Keep the previous snapshot; the next poll retries.
            Err(err) => propoto_warn!("proposal snapshot poll failed: {err}"),
        }
        tokio::time::sleep(interval).await;
    }
}

async fn handle_command(
    agent: Arc<dyn AgentClient>,
    store: Arc<dyn ProposalStore>,
    org_id: String,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Generate { seq, request } => {
            propoto_info!(
                "generation seq={} started for {}",
                seq,
                request.prospect_name
            );
            let result = agent.generate(&request).await;
            if let Err(err) = &result {
                propoto_warn!("generation seq={seq} failed: {err}");
            }
            let _ = event_tx.send(EngineEvent::GenerationFinished { seq, result });
        }
        EngineCommand::Persist(new) => {
            // No completion event: the write becomes visible through the
            // next snapshot, or not at all if it failed.
            match store.create(&org_id, &new).await {
                Ok(id) => propoto_info!("persisted proposal {} for {}", id, new.prospect_name),
                Err(err) => propoto_warn!(
                    "failed to persist proposal for {}: {err}",
                    new.prospect_name
                ),
            }
        }
        EngineCommand::UpdateContent { id, content } => {
            if let Err(err) = store.update_content(&org_id, &id, &content).await {
                propoto_warn!("content update for {id} failed: {err}");
            }
        }
        EngineCommand::UpdateStatus { id, status } => {
            if let Err(err) = store.update_status(&org_id, &id, status).await {
                propoto_warn!("status update for {id} failed: {err}");
            }
        }
        EngineCommand::TrackExport { id, kind } => {
            if let Err(err) = store.track_export(&org_id, &id, kind).await {
                propoto_warn!("export tracking for {id} failed: {err}");
            }
        }
        EngineCommand::RefreshCatalogs => {
            let ModelsCatalog {
                models,
                default_model,
            } = agent.models().await.unwrap_or_else(|err| {
                propoto_warn!("model catalog fetch failed: {err}");
                ModelsCatalog::default()
            });
            let TemplatesCatalog { templates } = agent.templates().await.unwrap_or_else(|err| {
                propoto_warn!("template catalog fetch failed: {err}");
                TemplatesCatalog::default()
            });
            let default_model = if default_model.is_empty() {
                DEFAULT_MODEL_KEY.to_string()
            } else {
                default_model
            };
            let _ = event_tx.send(EngineEvent::CatalogsFetched {
                models,
                templates,
                default_model,
            });
        }
    }
}
