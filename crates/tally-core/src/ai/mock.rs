//! Mock backend for testing
//!
//! Provides configurable mock responses so the fallback paths can be
//! exercised without a running provider.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::AIBackend;

/// How the mock answers `generate`
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Return this text
    Reply(String),
    /// Fail as if the provider returned an error
    Fail(String),
    /// Fail as if generation hit the token limit
    Truncate,
    /// Sleep before replying (for timeout tests)
    Delay(Duration),
}

/// Mock AI backend for testing
#[derive(Clone)]
pub struct MockBackend {
    pub behavior: MockBehavior,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend that always replies
    pub fn new() -> Self {
        Self {
            behavior: MockBehavior::Reply("Mock model analysis of your expenses.".to_string()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self {
            behavior: MockBehavior::Reply(text.to_string()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            behavior: MockBehavior::Fail(message.to_string()),
        }
    }

    pub fn truncating() -> Self {
        Self {
            behavior: MockBehavior::Truncate,
        }
    }

    pub fn delayed(delay: Duration) -> Self {
        Self {
            behavior: MockBehavior::Delay(delay),
        }
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        match &self.behavior {
            MockBehavior::Reply(text) => Ok(text.clone()),
            MockBehavior::Fail(message) => Err(Error::Upstream(message.clone())),
            MockBehavior::Truncate => Err(Error::Truncated("mock token limit".to_string())),
            MockBehavior::Delay(delay) => {
                tokio::time::sleep(*delay).await;
                Ok("Mock model analysis (delayed).".to_string())
            }
        }
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
