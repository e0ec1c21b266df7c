use propoto_core::EpochMs;
use serde::{Deserialize, Serialize};

/// One audit-trail row, as the store keeps them. `details` is free-form JSON
/// whose shape depends on the action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Dotted action name, e.g. `proposal.generated`.
    pub action: String,
    #[serde(default = "default_actor")]
    pub actor_id: String,
    pub details: serde_json::Value,
    pub org_id: String,
    pub timestamp: EpochMs,
}

fn default_actor() -> String {
    "system".to_string()
}

impl AuditEntry {
    pub fn system(
        action: impl Into<String>,
        details: serde_json::Value,
        org_id: impl Into<String>,
        timestamp: EpochMs,
    ) -> Self {
        Self {
            action: action.into(),
            actor_id: default_actor(),
            details,
            org_id: org_id.into(),
            timestamp,
        }
    }
}
