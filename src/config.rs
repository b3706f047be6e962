//! Configuration management for chatflow
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//!
//! The API key is deliberately not part of [`Config`]: it is a per-session
//! credential entered at runtime and must never be written to a config file.

use crate::cli::{Cli, Commands};
use crate::error::{ChatflowError, Result};
use crate::providers::GenerationOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound accepted for `max_tokens` in either mode
const MAX_TOKENS_LIMIT: u32 = 200_000;

/// Main configuration structure for chatflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider configuration
    pub provider: ProviderConfig,
    /// Generation settings for chat sessions
    #[serde(default = "ModeConfig::chat_defaults")]
    pub chat: ModeConfig,
    /// Generation settings for workflow sessions
    #[serde(default = "ModeConfig::workflow_defaults")]
    pub workflow: ModeConfig,
}

/// Provider configuration
///
/// Specifies which remote text-generation provider to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type")]
    pub provider_type: String,

    /// Anthropic Messages API configuration
    #[serde(default)]
    pub anthropic: AnthropicConfig,
}

/// Anthropic provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    /// API base URL (useful for tests and local mocks)
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Value sent in the `anthropic-version` header
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// HTTP timeout for a single request (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_api_base() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_timeout_seconds() -> u64 {
    120
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_version: default_api_version(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Generation parameters for one interactive mode
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModeConfig {
    /// Model identifier sent to the provider
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum number of output tokens per request
    pub max_tokens: u32,

    /// Optional sampling temperature (0.0-1.0)
    #[serde(default)]
    pub temperature: Option<f32>,
}

fn default_model() -> String {
    "claude-3-sonnet-20240229".to_string()
}

impl ModeConfig {
    /// Defaults for chat sessions
    pub fn chat_defaults() -> Self {
        Self {
            model: default_model(),
            max_tokens: 1024,
            temperature: None,
        }
    }

    /// Defaults for workflow sessions
    ///
    /// Workflow documents are echoed back in full by `modify`, so the output
    /// budget is larger than for chat.
    pub fn workflow_defaults() -> Self {
        Self {
            model: default_model(),
            max_tokens: 4096,
            temperature: None,
        }
    }

    /// Build provider generation options from this mode's settings
    ///
    /// # Examples
    ///
    /// ```
    /// use chatflow::config::ModeConfig;
    ///
    /// let options = ModeConfig::chat_defaults().generation_options();
    /// assert_eq!(options.max_tokens, 1024);
    /// assert!(options.system.is_none());
    /// ```
    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: None,
        }
    }

    fn validate(&self, section: &str) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(ChatflowError::Config(format!("{}.model cannot be empty", section)).into());
        }

        if self.max_tokens == 0 || self.max_tokens > MAX_TOKENS_LIMIT {
            return Err(ChatflowError::Config(format!(
                "{}.max_tokens must be between 1 and {}",
                section, MAX_TOKENS_LIMIT
            ))
            .into());
        }

        if let Some(temperature) = self.temperature {
            if !(0.0..=1.0).contains(&temperature) {
                return Err(ChatflowError::Config(format!(
                    "{}.temperature must be between 0.0 and 1.0",
                    section
                ))
                .into());
            }
        }

        Ok(())
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default_config()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn default_config() -> Self {
        Self {
            provider: ProviderConfig {
                provider_type: "anthropic".to_string(),
                anthropic: AnthropicConfig::default(),
            },
            chat: ModeConfig::chat_defaults(),
            workflow: ModeConfig::workflow_defaults(),
        }
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ChatflowError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ChatflowError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider_type) = std::env::var("CHATFLOW_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(api_base) = std::env::var("CHATFLOW_API_BASE") {
            self.provider.anthropic.api_base = api_base;
        }

        if let Ok(model) = std::env::var("CHATFLOW_CHAT_MODEL") {
            self.chat.model = model;
        }

        if let Ok(model) = std::env::var("CHATFLOW_WORKFLOW_MODEL") {
            self.workflow.model = model;
        }

        if let Ok(max_tokens) = std::env::var("CHATFLOW_MAX_TOKENS") {
            match max_tokens.parse::<u32>() {
                Ok(value) => {
                    self.chat.max_tokens = value;
                    self.workflow.max_tokens = value;
                    tracing::debug!(max_tokens = value, "Env override: CHATFLOW_MAX_TOKENS");
                }
                Err(_) => tracing::warn!("Invalid CHATFLOW_MAX_TOKENS: {}", max_tokens),
            }
        }

        if let Ok(timeout) = std::env::var("CHATFLOW_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.provider.anthropic.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid CHATFLOW_TIMEOUT_SECONDS: {}", timeout);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        match &cli.command {
            Commands::Chat {
                model: Some(model), ..
            } => {
                tracing::debug!("CLI override: chat model = {}", model);
                self.chat.model = model.clone();
            }
            Commands::Workflow {
                model: Some(model), ..
            } => {
                tracing::debug!("CLI override: workflow model = {}", model);
                self.workflow.model = model.clone();
            }
            _ => {}
        }
    }

    /// Validate the configuration
    ///
    /// Ensures all configuration values are within acceptable ranges
    /// and that required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type.is_empty() {
            return Err(ChatflowError::Config("Provider type cannot be empty".to_string()).into());
        }

        let valid_providers = ["anthropic"];
        if !valid_providers.contains(&self.provider.provider_type.as_str()) {
            return Err(ChatflowError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                valid_providers.join(", ")
            ))
            .into());
        }

        if self.provider.anthropic.api_base.trim().is_empty() {
            return Err(ChatflowError::Config(
                "provider.anthropic.api_base cannot be empty".to_string(),
            )
            .into());
        }

        if self.provider.anthropic.timeout_seconds == 0 {
            return Err(ChatflowError::Config(
                "provider.anthropic.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        self.chat.validate("chat")?;
        self.workflow.validate("workflow")?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
