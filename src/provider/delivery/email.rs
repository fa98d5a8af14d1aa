//! Resend transactional email channel.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{DeliveryMethod, EmailConfig, EmergencyContact};
use crate::provider::{AlertChannel, ProviderError};

/// Resend send endpoint.
const RESEND_API_URL: &str = "https://api.resend.com/emails";

// ── Wire types ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

// ── Channel ──────────────────────────────────────────────────────

pub struct EmailChannel {
    client: reqwest::Client,
    api_key: String,
    from: String,
    endpoint: String,
}

impl EmailChannel {
    pub fn new(config: &EmailConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(ProviderError::MissingKey("resend"))?;
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            from: config.from.clone(),
            endpoint: config
                .endpoint
                .clone()
                .unwrap_or_else(|| RESEND_API_URL.to_string()),
        })
    }

    fn request_body<'a>(&'a self, to: &'a str, subject: &'a str, text: &'a str) -> SendEmailRequest<'a> {
        SendEmailRequest {
            from: &self.from,
            to: vec![to],
            subject,
            text,
        }
    }
}

#[async_trait]
impl AlertChannel for EmailChannel {
    async fn deliver(
        &self,
        contact: &EmergencyContact,
        subject: &str,
        body: &str,
    ) -> Result<(), ProviderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(&contact.address, subject, body))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(error) => error.message,
                Err(_) => format!("HTTP {status}"),
            };
            return Err(ProviderError::Api {
                provider: "resend",
                message,
            });
        }

        let sent: SendEmailResponse = response.json().await?;
        debug!(to = %contact.address, email_id = %sent.id, "alert email accepted");
        Ok(())
    }

    fn name(&self) -> &str {
        "resend"
    }

    fn supports(&self, method: DeliveryMethod) -> bool {
        method == DeliveryMethod::Email
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> EmailChannel {
        EmailChannel::new(&EmailConfig {
            api_key: Some("re_test".to_string()),
            ..EmailConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn new_without_key_fails() {
        let config = EmailConfig::default();
        assert!(matches!(
            EmailChannel::new(&config),
            Err(ProviderError::MissingKey("resend"))
        ));
    }

    #[test]
    fn request_body_shape() {
        let channel = channel();
        let body = channel.request_body("anna@example.org", "Alert", "Check on Willem.");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["from"], "GuardianSwitch <onboarding@resend.dev>");
        assert_eq!(json["to"][0], "anna@example.org");
        assert_eq!(json["subject"], "Alert");
        assert_eq!(json["text"], "Check on Willem.");
    }

    #[test]
    fn supports_only_email() {
        let channel = channel();
        assert!(channel.supports(DeliveryMethod::Email));
        assert!(!channel.supports(DeliveryMethod::Telegram));
        assert!(!channel.supports(DeliveryMethod::Sms));
    }

    #[test]
    fn response_and_error_bodies_parse() {
        let sent: SendEmailResponse =
            serde_json::from_str(r#"{"id":"4ef0945f"}"#).unwrap();
        assert_eq!(sent.id, "4ef0945f");

        let error: ErrorBody =
            serde_json::from_str(r#"{"statusCode":422,"name":"validation_error","message":"Invalid `to` field"}"#)
                .unwrap();
        assert_eq!(error.message, "Invalid `to` field");
    }
}
