//! Client for the OpenAI-compatible text generation service.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GenerationConfig;

/// Errors returned by the generation client.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The HTTP request itself failed.
    #[error("generation request failed: {0}")]
    Request(String),
    /// The service answered with a non-success status.
    #[error("generation service returned status {0}")]
    Status(u16),
    /// The response body did not match the expected shape.
    #[error("generation response parse error: {0}")]
    Parse(String),
    /// The service answered without any choices.
    #[error("generation service returned an empty completion")]
    Empty,
}

/// HTTP client for chat completions.
#[derive(Clone)]
pub struct GenerationClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl GenerationClient {
    /// Create a new client from the service configuration.
    #[must_use]
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!(
                "{}/chat/completions",
                config.api_url.trim_end_matches('/')
            ),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    /// Run one chat completion and return the assistant text.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] when the request fails, the service
    /// answers with a non-success status, or the body cannot be parsed.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GenerationError::Status(response.status().as_u16()));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Parse(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(GenerationError::Empty)?;

        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(GenerationError::Empty);
        }

        Ok(content)
    }
}

/// Strip a Markdown code fence from generated output, if present.
///
/// Models often wrap JSON answers in ```json fences even when told not to.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = inner.strip_suffix("```") else {
        return trimmed;
    };

    match inner.split_once('\n') {
        Some((first, rest)) if first.chars().all(|ch| ch.is_ascii_alphanumeric()) => rest.trim(),
        _ => inner.trim(),
    }
}
