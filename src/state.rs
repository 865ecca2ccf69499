use std::sync::Arc;

use crate::config::Config;
use crate::conversation::Conversation;
use crate::error::ServiceError;
use crate::llm::openai::{self, OpenAiConfig};
use crate::llm::ChatMessage;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http: reqwest::Client,
    pub conversation: Arc<Conversation>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            http: reqwest::Client::new(),
            conversation: Arc::new(Conversation::tutor()),
        }
    }

    pub fn upstream(&self) -> Result<OpenAiConfig, ServiceError> {
        self.config.upstream().ok_or(ServiceError::MissingCredentials)
    }

    /// Run one completion with the configured model parameters.
    pub async fn complete(
        &self,
        upstream: &OpenAiConfig,
        messages: Vec<ChatMessage>,
    ) -> Result<String, ServiceError> {
        let reply = openai::complete(
            &self.http,
            upstream,
            messages,
            &self.config.model,
            self.config.max_tokens,
            self.config.temperature,
        )
        .await?;
        Ok(reply)
    }
}
