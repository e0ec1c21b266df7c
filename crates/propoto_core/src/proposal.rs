use std::fmt;

use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch, the store's native timestamp unit.
pub type EpochMs = u64;

/// Opaque store-assigned proposal identifier. Never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProposalId(pub String);

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProposalId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    #[default]
    Draft,
    Sent,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Draft => "draft",
            ProposalStatus::Sent => "sent",
        }
    }

    /// The status the send/unsend toggle moves to from `self`.
    pub fn toggled(&self) -> Self {
        match self {
            ProposalStatus::Draft => ProposalStatus::Sent,
            ProposalStatus::Sent => ProposalStatus::Draft,
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTier {
    pub name: String,
    pub price: String,
    #[serde(default)]
    pub features: Vec<String>,
}

/// Structured proposal body as produced by the agent service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProposalContent {
    #[serde(default)]
    pub executive_summary: String,
    #[serde(default)]
    pub current_situation: String,
    #[serde(default)]
    pub proposed_strategy: String,
    #[serde(default)]
    pub why_us: String,
    /// Ordered pricing tiers.
    #[serde(default)]
    pub investment: Vec<PricingTier>,
    #[serde(default)]
    pub next_steps: String,
}

/// A persisted proposal as the store returns it. Read-only to the client
/// except through the explicit update operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRecord {
    #[serde(rename = "_id")]
    pub id: ProposalId,
    pub prospect_name: String,
    pub prospect_url: String,
    pub pain_points: String,
    pub content: ProposalContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pptx_url: Option<String>,
    pub status: ProposalStatus,
    pub org_id: String,
    pub created_at: EpochMs,
    pub updated_at: EpochMs,
    #[serde(default)]
    pub views: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_viewed_at: Option<EpochMs>,
}

/// Fields of a freshly generated proposal waiting to be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProposal {
    pub prospect_name: String,
    pub prospect_url: String,
    pub pain_points: String,
    pub content: ProposalContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pptx_url: Option<String>,
}

/// Request body for the agent service's generate endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prospect_name: String,
    pub prospect_url: String,
    pub pain_points: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_scrape: Option<bool>,
}

/// Response body of the agent service's generate endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub data: ProposalContent,
    #[serde(default)]
    pub presentation_url: Option<String>,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub pptx_url: Option<String>,
    #[serde(default)]
    pub model_used: Option<String>,
    #[serde(default)]
    pub template_used: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelOption {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateOption {
    pub key: String,
    pub name: String,
    pub description: String,
    pub tone: String,
}

/// Export kinds the store tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Pdf,
    Pptx,
    Email,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Pdf => "pdf",
            ExportKind::Pptx => "pptx",
            ExportKind::Email => "email",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
