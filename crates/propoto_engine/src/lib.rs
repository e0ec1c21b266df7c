//! Propoto engine: agent and store IO, the snapshot subscription, and local
//! proposal export.
mod agent;
mod audit;
mod document;
mod engine;
mod memory;
mod persist;
mod store;
mod types;

pub use agent::{AgentClient, AgentSettings, ReqwestAgentClient};
pub use audit::AuditEntry;
pub use document::render_markdown;
pub use engine::{EngineConfig, EngineHandle};
pub use memory::{MemoryStore, StoreClock};
pub use persist::{ensure_output_dir, proposal_filename, AtomicFileWriter, PersistError};
pub use store::{HttpProposalStore, ProposalStore, StoreError, StoreSettings};
pub use types::{AgentError, AgentFailure, EngineEvent, ModelsCatalog, TemplatesCatalog};
