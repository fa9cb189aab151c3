//! Pluggable external-model backend abstraction
//!
//! The deterministic narrative engine is always available; an external model
//! is an optional upgrade used only when credentials are configured.
//!
//! # Architecture
//!
//! - `AIBackend` trait: defines the interface for all backends
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! // None when no provider credentials are configured
//! let ai = AIClient::from_env();
//!
//! if let Some(ref client) = ai {
//!     let text = client.generate(&prompt).await?;
//! }
//! ```
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (gemini, openai_compatible, mock). Default: gemini
//! - `GEMINI_API_KEY`: API key (required for gemini backend)
//! - `GEMINI_MODEL`: Model name (default: gemini-1.5-flash)
//! - `GEMINI_API_URL`: Override the API base URL
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required for openai_compatible backend)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-3.5-turbo)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)

mod gemini;
mod mock;
mod openai_compatible;

pub use gemini::GeminiBackend;
pub use mock::{MockBackend, MockBehavior};
pub use openai_compatible::OpenAICompatibleBackend;

use async_trait::async_trait;

use crate::error::Result;

/// Sampling temperature for analysis requests
pub const GENERATION_TEMPERATURE: f32 = 0.7;

/// Output token cap for analysis requests
pub const MAX_OUTPUT_TOKENS: u32 = 500;

/// Trait defining the interface for all external-model backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Generate free text for a prompt
    ///
    /// Must return an error (never partial text) when the provider reports
    /// that generation was cut short.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get the model name
    fn model(&self) -> &str;

    /// Get the backend host/URL
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// Google Gemini generateContent API
    Gemini(GeminiBackend),
    /// OpenAI-compatible chat completions (vLLM, LocalAI, llama-server, etc.)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from environment variables
    ///
    /// Checks `AI_BACKEND` to determine which backend to use:
    /// - `gemini` (default): Uses GEMINI_API_KEY, GEMINI_MODEL and GEMINI_API_URL
    /// - `openai_compatible`: Uses OPENAI_COMPATIBLE_HOST and OPENAI_COMPATIBLE_MODEL
    /// - `mock`: Creates a mock backend for testing
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "gemini".to_string());

        match backend.to_lowercase().as_str() {
            "gemini" | "google" => GeminiBackend::from_env().map(AIClient::Gemini),
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => {
                OpenAICompatibleBackend::from_env().map(AIClient::OpenAICompatible)
            }
            "mock" => Some(AIClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown AI_BACKEND, falling back to gemini");
                GeminiBackend::from_env().map(AIClient::Gemini)
            }
        }
    }

    /// Create a Gemini backend directly
    pub fn gemini(api_key: &str, model: &str) -> Self {
        AIClient::Gemini(GeminiBackend::new(api_key, model))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }
}

// Implement AIBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AIBackend for AIClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        match self {
            AIClient::Gemini(b) => b.generate(prompt).await,
            AIClient::OpenAICompatible(b) => b.generate(prompt).await,
            AIClient::Mock(b) => b.generate(prompt).await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.model(),
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.host(),
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_client_mock() {
        let client = AIClient::mock();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
    }

    #[tokio::test]
    async fn test_mock_generate() {
        let client = AIClient::mock();
        let text = client.generate("Total Expenses: ₹10.00").await.unwrap();
        assert!(!text.is_empty());
    }

    #[test]
    fn test_gemini_constructor() {
        let client = AIClient::gemini("secret", "gemini-1.5-flash");
        assert_eq!(client.model(), "gemini-1.5-flash");
        assert!(client.host().starts_with("https://"));
    }
}
