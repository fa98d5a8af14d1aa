//! Recording delivery channel for tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::{DeliveryMethod, EmergencyContact};
use crate::provider::{AlertChannel, ProviderError};

/// One recorded delivery, for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedDelivery {
    pub address: String,
    pub subject: String,
    pub body: String,
}

/// Accepts every method by default, records what it "sent", and can be
/// scripted to fail.
pub struct MockChannel {
    methods: Vec<DeliveryMethod>,
    fail: bool,
    sent: Arc<Mutex<Vec<RecordedDelivery>>>,
}

impl MockChannel {
    pub fn new() -> Self {
        Self {
            methods: vec![DeliveryMethod::Email, DeliveryMethod::Telegram],
            fail: false,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Restrict the channel to a single method.
    pub fn for_method(method: DeliveryMethod) -> Self {
        Self {
            methods: vec![method],
            ..Self::new()
        }
    }

    /// Every delivery attempt fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn deliveries(&self) -> Vec<RecordedDelivery> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AlertChannel for MockChannel {
    async fn deliver(
        &self,
        contact: &EmergencyContact,
        subject: &str,
        body: &str,
    ) -> Result<(), ProviderError> {
        if self.fail {
            return Err(ProviderError::Api {
                provider: "mock",
                message: "scripted delivery failure".to_string(),
            });
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(RecordedDelivery {
                address: contact.address.clone(),
                subject: subject.to_string(),
                body: body.to_string(),
            });
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn supports(&self, method: DeliveryMethod) -> bool {
        self.methods.contains(&method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(method: DeliveryMethod) -> EmergencyContact {
        EmergencyContact {
            name: "Anna".to_string(),
            method,
            address: "anna@example.org".to_string(),
        }
    }

    #[tokio::test]
    async fn records_deliveries() {
        let channel = MockChannel::new();
        channel
            .deliver(&contact(DeliveryMethod::Email), "Alert", "body")
            .await
            .unwrap();
        let deliveries = channel.deliveries();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].address, "anna@example.org");
        assert_eq!(deliveries[0].subject, "Alert");
    }

    #[tokio::test]
    async fn failing_variant_records_nothing() {
        let channel = MockChannel::failing();
        assert!(
            channel
                .deliver(&contact(DeliveryMethod::Email), "Alert", "body")
                .await
                .is_err()
        );
        assert!(channel.deliveries().is_empty());
    }

    #[test]
    fn method_restriction() {
        let channel = MockChannel::for_method(DeliveryMethod::Telegram);
        assert!(channel.supports(DeliveryMethod::Telegram));
        assert!(!channel.supports(DeliveryMethod::Email));

        let broad = MockChannel::new();
        assert!(broad.supports(DeliveryMethod::Email));
        assert!(!broad.supports(DeliveryMethod::Sms));
    }
}
