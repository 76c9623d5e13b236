use async_trait::async_trait;
use community_core::{ChatMessage, Config};
use reqwest::Client;
use tracing::debug;

use crate::api::models::{ApiMessage, ChatCompletionRequest, ChatCompletionResponse};
use crate::error::{CompletionError, Result};
use crate::service::CompletionService;

const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// HTTP implementation of [`CompletionService`].
pub struct HttpCompletionService {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
}

impl HttpCompletionService {
    pub fn new(config: &Config) -> Self {
        let mut service =
            Self::with_base_url(&config.completion_base_url, config.completion_api_key.clone());
        if let Some(model) = &config.model {
            service.model = model.clone();
        }
        service.temperature = config.temperature;
        service
    }

    pub fn with_base_url(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.6,
        }
    }
}

#[async_trait]
impl CompletionService for HttpCompletionService {
    async fn complete(&self, system_prompt: &str, turns: &[ChatMessage]) -> Result<String> {
        let mut messages = Vec::with_capacity(turns.len() + 1);
        messages.push(ApiMessage::system(system_prompt));
        messages.extend(turns.iter().map(ApiMessage::from));

        debug!(turns = turns.len(), model = %self.model, "sending completion request");

        let mut request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&ChatCompletionRequest {
                model: self.model.clone(),
                messages,
                temperature: self.temperature,
            });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(CompletionError::Service { status, message });
        }

        let body: ChatCompletionResponse = response.json().await?;
        body.into_text().ok_or(CompletionError::EmptyResponse)
    }
}
