//! Text-generation and alert-delivery provider traits and implementations.

pub mod delivery;
pub mod text;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::{DeliveryMethod, EmergencyContact};

/// Failures at the vendor-API seam. Surfaced as an error string in the
/// JSON response; never retried.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} returned an error: {message}")]
    Api {
        provider: &'static str,
        message: String,
    },

    #[error("{0} returned an empty response")]
    EmptyResponse(&'static str),

    #[error("missing API key for {0}")]
    MissingKey(&'static str),

    #[error("invalid address '{address}': {reason}")]
    BadAddress { address: String, reason: String },
}

/// Outcome of one delivery attempt, recorded in the alert log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sent,
    Failed,
    Skipped,
}

// ── Text generation ──────────────────────────────────────────────

/// Produces alarm and acknowledgment text from a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}

// ── Alert delivery ───────────────────────────────────────────────

/// Delivers a composed alert to a single contact.
#[async_trait]
pub trait AlertChannel: Send + Sync {
    async fn deliver(
        &self,
        contact: &EmergencyContact,
        subject: &str,
        body: &str,
    ) -> Result<(), ProviderError>;

    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Whether this channel handles contacts with the given method.
    fn supports(&self, method: DeliveryMethod) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_status_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&DeliveryStatus::Sent).unwrap(), "\"sent\"");
        assert_eq!(
            serde_json::to_string(&DeliveryStatus::Skipped).unwrap(),
            "\"skipped\""
        );
    }

    #[test]
    fn error_messages_name_the_provider() {
        let err = ProviderError::Api {
            provider: "gemini",
            message: "quota exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "gemini returned an error: quota exceeded");

        let err = ProviderError::MissingKey("resend");
        assert!(err.to_string().contains("resend"));
    }

    #[test]
    fn bad_address_includes_reason() {
        let err = ProviderError::BadAddress {
            address: "abc".to_string(),
            reason: "not a chat id".to_string(),
        };
        assert!(err.to_string().contains("abc"));
        assert!(err.to_string().contains("not a chat id"));
    }
}
