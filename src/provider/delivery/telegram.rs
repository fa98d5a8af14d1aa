//! Telegram alert channel.
//!
//! One-shot `sendMessage` calls through teloxide; the contact address is
//! the numeric chat id the user gets from @userinfobot.

use async_trait::async_trait;
use teloxide::Bot;
use teloxide::prelude::Requester;
use teloxide::types::ChatId;
use tracing::debug;

use crate::config::{DeliveryMethod, EmergencyContact, TelegramConfig};
use crate::provider::{AlertChannel, ProviderError};

pub struct TelegramChannel {
    bot: Bot,
}

impl TelegramChannel {
    pub fn new(config: &TelegramConfig) -> Result<Self, ProviderError> {
        let token = config
            .bot_token
            .clone()
            .ok_or(ProviderError::MissingKey("telegram"))?;
        Ok(Self {
            bot: Bot::new(token),
        })
    }

    fn parse_chat_id(address: &str) -> Result<ChatId, ProviderError> {
        address
            .trim()
            .parse::<i64>()
            .map(ChatId)
            .map_err(|_| ProviderError::BadAddress {
                address: address.to_string(),
                reason: "expected a numeric Telegram chat id".to_string(),
            })
    }
}

#[async_trait]
impl AlertChannel for TelegramChannel {
    async fn deliver(
        &self,
        contact: &EmergencyContact,
        subject: &str,
        body: &str,
    ) -> Result<(), ProviderError> {
        let chat = Self::parse_chat_id(&contact.address)?;
        self.bot
            .send_message(chat, format!("{subject}\n\n{body}"))
            .await
            .map_err(|e| ProviderError::Api {
                provider: "telegram",
                message: e.to_string(),
            })?;
        debug!(chat_id = chat.0, "alert message sent to Telegram");
        Ok(())
    }

    fn name(&self) -> &str {
        "telegram"
    }

    fn supports(&self, method: DeliveryMethod) -> bool {
        method == DeliveryMethod::Telegram
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_without_token_fails() {
        let config = TelegramConfig::default();
        assert!(matches!(
            TelegramChannel::new(&config),
            Err(ProviderError::MissingKey("telegram"))
        ));
    }

    #[test]
    fn chat_ids_parse() {
        assert_eq!(TelegramChannel::parse_chat_id("123456").unwrap(), ChatId(123456));
        // Group chats have negative ids.
        assert_eq!(
            TelegramChannel::parse_chat_id(" -1001234567890 ").unwrap(),
            ChatId(-1001234567890)
        );
    }

    #[test]
    fn non_numeric_address_is_rejected() {
        let err = TelegramChannel::parse_chat_id("@someone").unwrap_err();
        assert!(matches!(err, ProviderError::BadAddress { .. }));
    }

    #[test]
    fn supports_only_telegram() {
        let channel = TelegramChannel::new(&TelegramConfig {
            bot_token: Some("123:abc".to_string()),
        })
        .unwrap();
        assert!(channel.supports(DeliveryMethod::Telegram));
        assert!(!channel.supports(DeliveryMethod::Email));
    }
}
