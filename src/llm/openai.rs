use super::{ChatMessage, ChatRequest, LlmError};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
}

impl OpenAiConfig {
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: String,
}

/// Send the whole message sequence upstream and return the first candidate.
pub async fn chat(
    client: &Client,
    config: &OpenAiConfig,
    request: &ChatRequest,
) -> Result<String, LlmError> {
    let resp = client
        .post(config.completions_url())
        .header("Content-Type", "application/json")
        .bearer_auth(&config.api_key)
        .json(request)
        .send()
        .await?;

    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(LlmError::Unauthorized);
    }
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err(LlmError::Api {
            status: status.as_u16(),
            message: text,
        });
    }

    let body = resp.text().await?;
    let data: OpenAiResponse =
        serde_json::from_str(&body).map_err(|e| LlmError::Parse(e.to_string()))?;
    data.choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| LlmError::Parse("response contained no choices".into()))
}

/// Convenience wrapper used by the handlers.
pub async fn complete(
    client: &Client,
    config: &OpenAiConfig,
    messages: Vec<ChatMessage>,
    model: &str,
    max_tokens: u32,
    temperature: f32,
) -> Result<String, LlmError> {
    let request = ChatRequest {
        model: model.to_string(),
        messages,
        max_tokens,
        temperature,
    };
    tracing::debug!(model, messages = request.messages.len(), "sending completion request");
    chat(client, config, &request).await
}
