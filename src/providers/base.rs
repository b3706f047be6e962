//! Base provider trait and common types for chatflow
//!
//! This module defines the Provider trait that remote text-generation
//! backends implement, along with the message and option types passed
//! on every request.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Text typed by the user
    User,
    /// Text returned by the model
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// Message structure for conversation
///
/// Messages are immutable once created; the full ordered sequence is sent
/// to the provider on every request since the remote end keeps no session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: Role,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use chatflow::providers::{Message, Role};
    ///
    /// let msg = Message::user("Hello, assistant!");
    /// assert_eq!(msg.role, Role::User);
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates a new assistant message
    ///
    /// # Examples
    ///
    /// ```
    /// use chatflow::providers::{Message, Role};
    ///
    /// let msg = Message::assistant("Hello, user!");
    /// assert_eq!(msg.role, Role::Assistant);
    /// ```
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Per-request generation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    /// Model identifier
    pub model: String,
    /// Maximum number of output tokens
    pub max_tokens: u32,
    /// Optional sampling temperature
    pub temperature: Option<f32>,
    /// Optional system instruction sent alongside the messages
    pub system: Option<String>,
}

impl GenerationOptions {
    /// Return a copy of these options with the given system instruction
    ///
    /// # Examples
    ///
    /// ```
    /// use chatflow::config::ModeConfig;
    ///
    /// let options = ModeConfig::workflow_defaults()
    ///     .generation_options()
    ///     .with_system("You are terse.");
    /// assert_eq!(options.system.as_deref(), Some("You are terse."));
    /// ```
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Token usage information from a completion
///
/// Tracks the number of tokens used in prompts and completions,
/// as reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: usize,
    /// Number of tokens in the completion
    pub completion_tokens: usize,
    /// Total tokens used (prompt + completion)
    pub total_tokens: usize,
}

impl TokenUsage {
    /// Create a new TokenUsage instance
    ///
    /// # Examples
    ///
    /// ```
    /// use chatflow::providers::TokenUsage;
    ///
    /// let usage = TokenUsage::new(100, 50);
    /// assert_eq!(usage.total_tokens, 150);
    /// ```
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Provider trait for remote text-generation backends
///
/// One operation, one network round trip, no streaming and no retry.
///
/// # Examples
///
/// ```no_run
/// use chatflow::providers::{GenerationOptions, Message, Provider};
/// use chatflow::error::Result;
/// use async_trait::async_trait;
///
/// struct EchoProvider;
///
/// #[async_trait]
/// impl Provider for EchoProvider {
///     async fn generate(
///         &self,
///         messages: &[Message],
///         _options: &GenerationOptions,
///     ) -> Result<String> {
///         Ok(messages.last().map(|m| m.content.clone()).unwrap_or_default())
///     }
/// }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate a reply for the given ordered messages
    ///
    /// # Arguments
    ///
    /// * `messages` - Full ordered conversation to send
    /// * `options` - Model, output budget, temperature, and system instruction
    ///
    /// # Returns
    ///
    /// Returns the reply text
    ///
    /// # Errors
    ///
    /// Returns a remote error on network failure, authentication rejection,
    /// rate limiting, or a malformed response
    async fn generate(&self, messages: &[Message], options: &GenerationOptions)
        -> Result<String>;
}
