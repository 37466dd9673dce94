//! Provider factory
//!
//! Builds the closed [`Provider`] variant from configuration once, at
//! startup. The choice is never re-dispatched per request.

use super::{ChatCompletionsProvider, MessagesProvider, Provider, ProviderKind};
use crate::config::LlmConfig;
use crate::error::{Error, Result};

/// Create a provider from config
///
/// # Errors
/// Returns [`Error::Config`] if no API key is configured
pub fn create_provider(config: &LlmConfig) -> Result<Provider> {
    if !config.has_api_key() {
        return Err(Error::Config(format!(
            "No API key configured for {}. Set {} in your environment or .env file",
            config.provider,
            config.provider.api_key_env()
        )));
    }

    let settings = config.generation_settings();
    let base_url = config.base_url();
    tracing::info!(
        provider = %config.provider,
        model = %settings.model,
        base_url,
        "Creating provider"
    );

    let provider = match config.provider {
        ProviderKind::OpenAI => Provider::ChatCompletions(ChatCompletionsProvider::new(
            config.api_key.trim(),
            base_url,
            settings,
        )?),
        ProviderKind::Anthropic => Provider::Messages(MessagesProvider::new(
            config.api_key.trim(),
            base_url,
            settings,
        )?),
    };
    Ok(provider)
}
