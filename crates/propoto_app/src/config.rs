use std::path::PathBuf;
use std::time::Duration;

use propoto_engine::{AgentSettings, EngineConfig, StoreSettings};

/// Environment-derived settings. The default org stands in for real
/// multi-tenant scoping and is threaded explicitly from here; no other module
/// assumes an organization.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub agent_url: String,
    pub agent_key: String,
    /// Store deployment URL; unset runs against the in-process demo store.
    pub store_url: Option<String>,
    pub org_id: String,
    pub output_dir: PathBuf,
    pub poll_interval: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            agent_url: env_or("PROPOTO_AGENT_URL", "http://localhost:8000"),
            agent_key: env_or("PROPOTO_AGENT_KEY", "dev-secret-key"),
            store_url: std::env::var("PROPOTO_STORE_URL")
                .ok()
                .filter(|value| !value.trim().is_empty()),
            org_id: env_or("PROPOTO_ORG", "demo-org-1"),
            output_dir: std::env::var("PROPOTO_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("output")),
            poll_interval: Duration::from_millis(
                std::env::var("PROPOTO_POLL_MS")
                    .ok()
                    .and_then(|value| value.parse().ok())
                    .unwrap_or(1_500),
            ),
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            agent: AgentSettings {
                base_url: self.agent_url.clone(),
                api_key: self.agent_key.clone(),
                ..AgentSettings::default()
            },
            store: self.store_url.as_ref().map(StoreSettings::new),
            org_id: self.org_id.clone(),
            poll_interval: self.poll_interval,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
