use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatRequest};
use super::CompletionService;
use crate::config::{Config, DEFAULT_BASE_URL};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Single-shot OpenAI chat-completion client.
///
/// Every failure is reported as [`Error::Completion`] with the underlying
/// message; callers never need to distinguish transport, auth or quota errors.
pub struct OpenAiCompletionClient {
    client: Client,
    credential: SecretString,
    model: String,
    base_url: String,
}

impl OpenAiCompletionClient {
    pub fn new(credential: SecretString, model: String) -> Self {
        Self::new_with_client(credential, model, Client::new())
    }

    pub fn new_with_client(credential: SecretString, model: String, client: Client) -> Self {
        Self {
            client,
            credential,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn from_config(config: &Config, client: Client) -> Self {
        Self::new_with_client(config.credential.clone(), config.model.clone(), client)
            .with_base_url(config.base_url.clone())
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send(&self, request: &ChatRequest) -> Result<ChatCompletionResponse> {
        let url = format!("{}{}", self.base_url, CHAT_COMPLETIONS_PATH);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: request.messages(),
        };

        tracing::debug!(
            "Sending chat completion request ({} messages, model {})",
            body.messages.len(),
            self.model
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.credential.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to OpenAI: {}", e);
                Error::Completion(e.to_string())
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Completion(e.to_string()))?;

        if !status.is_success() {
            tracing::error!("OpenAI API error (status {}): {}", status, text);
            return Err(Error::Completion(format!(
                "OpenAI API error (status {}): {}",
                status, text
            )));
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!("Failed to parse OpenAI response: {}\nBody: {}", e, text);
            Error::Completion(format!("Failed to parse OpenAI response: {}", e))
        })
    }
}

#[async_trait]
impl CompletionService for OpenAiCompletionClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let response = self.send(request).await?;

        let choice = response.choices.into_iter().next();
        if let Some(reason) = choice.as_ref().and_then(|c| c.finish_reason.as_deref()) {
            tracing::debug!("Completion finished: {}", reason);
        }

        choice
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                tracing::error!("OpenAI response contained no answer text");
                Error::Completion("No response from OpenAI chat API".to_string())
            })
    }
}
