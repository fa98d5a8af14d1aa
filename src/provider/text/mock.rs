//! Canned text generator for tests and keyless demo runs.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::provider::{ProviderError, TextGenerator};

/// Replays a fixed reply and records every prompt it was given.
pub struct MockGenerator {
    reply: String,
    fail: bool,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            fail: false,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A generator whose every call fails, for error-path tests.
    pub fn failing() -> Self {
        Self {
            reply: String::new(),
            fail: true,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts seen so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new("Automated welfare notice: please check in with the monitored user.")
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if self.fail {
            return Err(ProviderError::Api {
                provider: "mock",
                message: "scripted failure".to_string(),
            });
        }
        Ok(self.reply.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_reply_and_records_prompts() {
        let generator = MockGenerator::new("canned");
        assert_eq!(generator.generate("first").await.unwrap(), "canned");
        assert_eq!(generator.generate("second").await.unwrap(), "canned");
        assert_eq!(generator.prompts(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn failing_variant_errors() {
        let generator = MockGenerator::failing();
        assert!(generator.generate("anything").await.is_err());
        // The prompt is still recorded for assertions.
        assert_eq!(generator.prompts().len(), 1);
    }

    #[test]
    fn default_reply_is_non_empty() {
        let generator = MockGenerator::default();
        assert!(!generator.reply.is_empty());
        assert_eq!(generator.name(), "mock");
    }
}
