use std::fmt;

use propoto_core::{GenerateResponse, ModelOption, ProposalRecord, TemplateOption};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The subscription observed a new state of the proposal collection.
    Snapshot(Vec<ProposalRecord>),
    /// A generation call finished, successfully or not.
    GenerationFinished {
        seq: u64,
        result: Result<GenerateResponse, AgentError>,
    },
    /// The model/template catalogs were (re)fetched.
    CatalogsFetched {
        models: Vec<ModelOption>,
        templates: Vec<TemplateOption>,
        default_model: String,
    },
}

/// Wire shape of the agent service's model catalog endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModelsCatalog {
    #[serde(default)]
    pub models: Vec<ModelOption>,
    #[serde(rename = "default", default)]
    pub default_model: String,
}

/// Wire shape of the agent service's template catalog endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TemplatesCatalog {
    #[serde(default)]
    pub templates: Vec<TemplateOption>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentError {
    pub kind: AgentFailure,
    pub message: String,
}

impl AgentError {
    pub(crate) fn new(kind: AgentFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for AgentError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentFailure {
    HttpStatus(u16),
    Timeout,
    Network,
    InvalidPayload,
    /// The service answered 200 but flagged the generation as failed.
    Rejected,
}

impl fmt::Display for AgentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentFailure::HttpStatus(code) => write!(f, "agent http status {code}"),
            AgentFailure::Timeout => write!(f, "agent timeout"),
            AgentFailure::Network => write!(f, "agent network error"),
            AgentFailure::InvalidPayload => write!(f, "invalid agent payload"),
            AgentFailure::Rejected => write!(f, "agent rejected the request"),
        }
    }
}
