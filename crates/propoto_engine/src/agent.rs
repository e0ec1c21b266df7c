use std::time::Duration;

use propoto_core::{GenerateRequest, GenerateResponse};

use crate::types::{AgentError, AgentFailure, ModelsCatalog, TemplatesCatalog};

#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub base_url: String,
    pub api_key: String,
    pub connect_timeout: Duration,
    /// Generation runs a scrape plus an LLM call; allow it to take a while.
    pub request_timeout: Duration,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            api_key: "dev-secret-key".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(180),
        }
    }
}

#[async_trait::async_trait]
pub trait AgentClient: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, AgentError>;
    async fn models(&self) -> Result<ModelsCatalog, AgentError>;
    async fn templates(&self) -> Result<TemplatesCatalog, AgentError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestAgentClient {
    settings: AgentSettings,
}

impl ReqwestAgentClient {
    pub fn new(settings: AgentSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, AgentError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| AgentError::new(AgentFailure::Network, err.to_string()))
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/agents/proposal/{path}",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, AgentError> {
        let client = self.build_client()?;
        let response = client
            .get(self.endpoint(path))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::new(
                AgentFailure::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        response
            .json::<T>()
            .await
            .map_err(|err| AgentError::new(AgentFailure::InvalidPayload, err.to_string()))
    }
}

#[async_trait::async_trait]
impl AgentClient for ReqwestAgentClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, AgentError> {
        let client = self.build_client()?;
        let response = client
            .post(self.endpoint("generate"))
            .header("x-api-key", &self.settings.api_key)
            .json(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::new(
                AgentFailure::HttpStatus(status.as_u16()),
                error_detail(&body, status),
            ));
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|err| AgentError::new(AgentFailure::InvalidPayload, err.to_string()))?;
        if !payload.success {
            return Err(AgentError::new(
                AgentFailure::Rejected,
                "agent reported an unsuccessful generation",
            ));
        }
        Ok(payload)
    }

    async fn models(&self) -> Result<ModelsCatalog, AgentError> {
        self.get_json("models").await
    }

    async fn templates(&self) -> Result<TemplatesCatalog, AgentError> {
        self.get_json("templates").await
    }
}

/// Prefers the service's own `detail` message over the bare status line.
fn error_detail(body: &str, status: reqwest::StatusCode) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .and_then(|detail| detail.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| status.to_string())
}

fn map_reqwest_error(err: reqwest::Error) -> AgentError {
    if err.is_timeout() {
        return AgentError::new(AgentFailure::Timeout, err.to_string());
    }
    AgentError::new(AgentFailure::Network, err.to_string())
}
