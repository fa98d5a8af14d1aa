//! Text generation providers.

mod gemini;
mod mock;

pub use gemini::{DEFAULT_MODEL, GeminiGenerator};
pub use mock::MockGenerator;

use std::sync::Arc;

use crate::config::GeneratorConfig;
use crate::provider::{ProviderError, TextGenerator};

/// Build the generator named by the config ("gemini" or "mock").
pub fn build(config: &GeneratorConfig) -> Result<Arc<dyn TextGenerator>, ProviderError> {
    match config.provider.as_str() {
        "mock" => Ok(Arc::new(MockGenerator::default())),
        _ => Ok(Arc::new(GeminiGenerator::new(config)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_mock_without_key() {
        let config = GeneratorConfig {
            provider: "mock".to_string(),
            ..GeneratorConfig::default()
        };
        let generator = build(&config).unwrap();
        assert_eq!(generator.name(), "mock");
    }

    #[test]
    fn build_gemini_requires_key() {
        let config = GeneratorConfig {
            provider: "gemini".to_string(),
            api_key: None,
            ..GeneratorConfig::default()
        };
        assert!(matches!(build(&config), Err(ProviderError::MissingKey(_))));
    }

    #[test]
    fn build_gemini_with_key() {
        let config = GeneratorConfig {
            api_key: Some("test-key".to_string()),
            ..GeneratorConfig::default()
        };
        let generator = build(&config).unwrap();
        assert_eq!(generator.name(), "gemini");
    }
}
