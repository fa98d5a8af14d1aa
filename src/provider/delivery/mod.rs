//! Alert delivery channels.

mod email;
mod mock;
mod telegram;

pub use email::EmailChannel;
pub use mock::MockChannel;
pub use telegram::TelegramChannel;

use std::sync::Arc;

use tracing::warn;

use crate::config::Config;
use crate::provider::AlertChannel;

/// Build every channel the config enables. A channel that cannot start
/// (missing key) is logged and left out; dispatches to its method are
/// then recorded as skipped.
pub fn build(config: &Config) -> Vec<Arc<dyn AlertChannel>> {
    let mut channels: Vec<Arc<dyn AlertChannel>> = Vec::new();

    match EmailChannel::new(&config.email) {
        Ok(channel) => channels.push(Arc::new(channel)),
        Err(e) => warn!("email channel unavailable: {e}"),
    }

    if config.telegram.bot_token.is_some() {
        match TelegramChannel::new(&config.telegram) {
            Ok(channel) => channels.push(Arc::new(channel)),
            Err(e) => warn!("telegram channel unavailable: {e}"),
        }
    }

    channels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_without_keys_yields_no_channels() {
        let config = Config::default();
        assert!(build(&config).is_empty());
    }

    #[test]
    fn build_with_keys_yields_both_channels() {
        let mut config = Config::default();
        config.email.api_key = Some("re_test".to_string());
        config.telegram.bot_token = Some("123:abc".to_string());
        let channels = build(&config);
        let names: Vec<&str> = channels.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["resend", "telegram"]);
    }
}
