//! OpenAI-compatible backend implementation
//!
//! Works with any server that implements the OpenAI chat completions API:
//! - vLLM (http://localhost:8000)
//! - LocalAI (http://localhost:8080)
//! - llama-server / llama.cpp (http://localhost:8080)
//! - Docker Model Runner (http://localhost:12434)
//!
//! # Configuration
//!
//! Environment variables:
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-3.5-turbo)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::{AIBackend, GENERATION_TEMPERATURE, MAX_OUTPUT_TOKENS};

/// OpenAI-compatible backend
///
/// Works with any server implementing the OpenAI `/v1/chat/completions` API.
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAICompatibleBackend {
    /// Create a new OpenAI-compatible backend
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
        }
    }

    /// Create with an API key
    pub fn with_api_key(base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            api_key: Some(api_key.to_string()),
            ..Self::new(base_url, model)
        }
    }

    /// Create from environment variables
    ///
    /// Required: `OPENAI_COMPATIBLE_HOST`
    /// Optional: `OPENAI_COMPATIBLE_MODEL` (default: gpt-3.5-turbo)
    /// Optional: `OPENAI_COMPATIBLE_API_KEY`
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("OPENAI_COMPATIBLE_HOST").ok()?;
        let model = std::env::var("OPENAI_COMPATIBLE_MODEL")
            .unwrap_or_else(|_| "gpt-3.5-turbo".to_string());
        let api_key = std::env::var("OPENAI_COMPATIBLE_API_KEY").ok();

        let mut backend = Self::new(&host, &model);
        backend.api_key = api_key;
        Some(backend)
    }

    /// Make a chat completion request
    async fn chat_completion(&self, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: Some(GENERATION_TEMPERATURE),
            max_tokens: Some(MAX_OUTPUT_TOKENS),
            stream: false,
        };

        let mut req_builder = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&request);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "OpenAI API error {}: {}",
                status, body
            )));
        }

        let chat_response: ChatCompletionResponse = response.json().await?;

        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::Upstream("No response from OpenAI API".into()))?;

        if choice.finish_reason.as_deref() == Some("length") {
            return Err(Error::Truncated("finish_reason length".to_string()));
        }

        Ok(choice.message.content)
    }
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

/// Chat message
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

/// Chat completion choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

/// Chat response message
#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[async_trait]
impl AIBackend for OpenAICompatibleBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let response = self.chat_completion(prompt).await?;
        debug!("OpenAI-compatible response: {} chars", response.len());
        Ok(response)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let backend = OpenAICompatibleBackend::new("http://localhost:8000/", "llama3.2");
        assert_eq!(backend.host(), "http://localhost:8000");
        assert_eq!(backend.model(), "llama3.2");
        assert!(backend.api_key.is_none());
    }

    #[test]
    fn test_with_api_key() {
        let backend =
            OpenAICompatibleBackend::with_api_key("http://localhost:8000", "m", "sk-test");
        assert_eq!(backend.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_choice_finish_reason_deserializes() {
        let raw = r#"{"choices":[{"message":{"content":"hi"},"finish_reason":"length"}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].finish_reason.as_deref(), Some("length"));

        let raw = r#"{"choices":[{"message":{"content":"hi"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.choices[0].finish_reason.is_none());
    }
}
