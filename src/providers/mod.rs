//! Provider module for chatflow
//!
//! This module contains the remote text-generation abstraction and the
//! Anthropic Messages API implementation.

pub mod anthropic;
pub mod base;

pub use anthropic::AnthropicProvider;
pub use base::{GenerationOptions, Message, Provider, Role, TokenUsage};

#[cfg(test)]
pub use base::MockProvider;

use crate::config::ProviderConfig;
use crate::error::{ChatflowError, Result};
use std::sync::Arc;

/// Constructs a provider bound to a secret
///
/// Sessions hold one of these so that entering a credential can build the
/// client without knowing which backend is configured.
pub type ProviderFactory = Arc<dyn Fn(&str) -> Result<Arc<dyn Provider>> + Send + Sync>;

/// Create a provider instance based on configuration
///
/// # Arguments
///
/// * `config` - Provider configuration
/// * `api_key` - Secret to bind to the provider
///
/// # Returns
///
/// Returns a shared provider instance
///
/// # Errors
///
/// Returns error if the provider type is unknown or initialization fails
pub fn create_provider(config: &ProviderConfig, api_key: &str) -> Result<Arc<dyn Provider>> {
    match config.provider_type.as_str() {
        "anthropic" => Ok(Arc::new(AnthropicProvider::new(
            config.anthropic.clone(),
            api_key,
        )?)),
        other => Err(ChatflowError::Config(format!("Unknown provider type: {}", other)).into()),
    }
}

/// Build a [`ProviderFactory`] that calls [`create_provider`] with a
/// snapshot of the given configuration
///
/// # Examples
///
/// ```
/// use chatflow::config::Config;
/// use chatflow::providers::factory_from_config;
///
/// let factory = factory_from_config(&Config::default().provider);
/// assert!(factory("sk-ant-test").is_ok());
/// assert!(factory("").is_err());
/// ```
pub fn factory_from_config(config: &ProviderConfig) -> ProviderFactory {
    let config = config.clone();
    Arc::new(move |api_key: &str| create_provider(&config, api_key))
}
