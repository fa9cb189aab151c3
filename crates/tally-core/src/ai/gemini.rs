//! Google Gemini backend implementation
//!
//! Calls the `generateContent` endpoint with the API key in the `x-goog-api-key`
//! header, keeping it out of request URLs and therefore out of error text.
//!
//! # Configuration
//!
//! Environment variables:
//! - `GEMINI_API_KEY`: API key (required; the unedited placeholder counts as unset)
//! - `GEMINI_MODEL`: Model name (default: gemini-1.5-flash)
//! - `GEMINI_API_URL`: Base URL (default: https://generativelanguage.googleapis.com/v1beta)

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

use super::{AIBackend, GENERATION_TEMPERATURE, MAX_OUTPUT_TOKENS};

/// Default API base URL
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Sample config files ship with this value; treat it as "not configured"
/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

const PLACEHOLDER_API_KEY: &str = "YOUR_GOOGLE_GEMINI_API_KEY_HERE";

/// Gemini backend
#[derive(Clone)]
pub struct GeminiBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiBackend {
    /// Create a new Gemini backend against the public API
    pub fn new(api_key: &str, model: &str) -> Self {
        Self::with_base_url(DEFAULT_GEMINI_API_URL, api_key, model)
    }

    /// Create a backend against a specific base URL (proxies, test servers)
    pub fn with_base_url(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Create from environment variables
    ///
    /// Required: `GEMINI_API_KEY`
    /// Optional: `GEMINI_MODEL`, `GEMINI_API_URL`
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty() && k != PLACEHOLDER_API_KEY)?;
        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
        let base_url =
            std::env::var("GEMINI_API_URL").unwrap_or_else(|_| DEFAULT_GEMINI_API_URL.to_string());

        Some(Self::with_base_url(&base_url, &api_key, &model))
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

/// generateContent request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
    top_k: u32,
}

impl GenerateContentRequest {
    fn for_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: GENERATION_TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
                top_p: 0.95,
                top_k: 40,
            },
        }
    }
}

/// Pull the generated text out of a generateContent reply
///
/// Accepts the current `candidates[0].content.parts[0].text` layout plus the
/// older `candidates[0].output` and bare `text` shapes.
pub(crate) fn extract_text(body: &Value) -> Result<String> {
    let finish_reason = body
        .pointer("/candidates/0/finishReason")
        .and_then(Value::as_str);
    if finish_reason == Some("MAX_TOKENS") {
        return Err(Error::Truncated("finishReason MAX_TOKENS".to_string()));
    }

    let text = body
        .pointer("/candidates/0/content/parts/0/text")
        .or_else(|| body.pointer("/candidates/0/output"))
        .or_else(|| body.get("text"))
        .and_then(Value::as_str);

    match text {
        Some(t) => Ok(t.to_string()),
        None if body.pointer("/candidates/0/content").is_some() => Err(Error::Upstream(
            "Response format error - content exists but no text found".to_string(),
        )),
        None => Err(Error::Upstream("Invalid API response format".to_string())),
    }
}

#[async_trait]
impl AIBackend for GeminiBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let response = self
            .http_client
            .post(self.endpoint())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&GenerateContentRequest::for_prompt(prompt))
            .send()
            .await
            .map_err(|e| Error::Http(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| {
                    v.pointer("/error/message")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                });
            return Err(Error::Upstream(match detail {
                Some(message) => format!("API returned error: {} - {}", status.as_u16(), message),
                None => format!("API returned error: {}", status.as_u16()),
            }));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::Http(e.without_url()))?;
        debug!(model = %self.model, "Gemini response received");
        extract_text(&body)
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
    use serde_json::json;

    #[test]
    fn test_request_shape() {
        let body = serde_json::to_value(GenerateContentRequest::for_prompt("hi")).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 500);
        assert_eq!(body["generationConfig"]["topK"], 40);
    }

    #[test]
    fn test_extract_text_variants() {
        let standard = json!({
            "candidates": [{"content": {"parts": [{"text": "primary"}]}, "finishReason": "STOP"}]
        });
        assert_eq!(extract_text(&standard).unwrap(), "primary");

        let legacy = json!({"candidates": [{"output": "legacy"}]});
        assert_eq!(extract_text(&legacy).unwrap(), "legacy");

        let bare = json!({"text": "bare"});
        assert_eq!(extract_text(&bare).unwrap(), "bare");
    }

    #[test]
    fn test_extract_text_truncated() {
        let body = json!({
            "candidates": [{"content": {"parts": [{"text": "half a thou"}]}, "finishReason": "MAX_TOKENS"}]
        });
        assert!(matches!(extract_text(&body), Err(Error::Truncated(_))));
    }

    #[test]
    fn test_extract_text_malformed() {
        let no_parts = json!({"candidates": [{"content": {"role": "model"}}]});
        assert!(matches!(extract_text(&no_parts), Err(Error::Upstream(_))));

        let nothing = json!({"unexpected": true});
        assert!(matches!(extract_text(&nothing), Err(Error::Upstream(_))));
    }

    #[test]
    fn test_endpoint() {
        let backend = GeminiBackend::with_base_url("http://localhost:9999/", "k", "m1");
        assert_eq!(
            backend.endpoint(),
            "http://localhost:9999/models/m1:generateContent"
        );
    }
}
