//! Chat session controller
//!
//! Idle → (submit) → Pending → Idle. A submit appends the user turn before
//! the provider call and appends the assistant turn only if the call
//! succeeds. A failed call leaves the user turn in place.

use crate::controller::{configure_credential, report};
use crate::error::{ChatflowError, Result};
use crate::providers::GenerationOptions;
use crate::render::RenderSink;
use crate::session::{ChatSession, Conversation};

/// Events a chat UI can raise
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// The user entered an API key
    CredentialEntered(String),
    /// The user submitted a chat message
    UserSubmitted(String),
    /// The user asked to clear the history
    ClearRequested,
}

/// Drives one chat session
#[derive(Debug)]
pub struct ChatController {
    session: ChatSession,
    options: GenerationOptions,
}

impl ChatController {
    /// Create a controller for `session`
    ///
    /// Chat requests never carry a system instruction, so any `system` in
    /// `options` is dropped.
    pub fn new(session: ChatSession, options: GenerationOptions) -> Self {
        Self {
            session,
            options: GenerationOptions {
                system: None,
                ..options
            },
        }
    }

    /// The session state
    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// The chat history
    pub fn conversation(&self) -> &Conversation {
        &self.session.conversation
    }

    /// Generation options used for every request
    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Whether a credential is configured
    pub fn is_ready(&self) -> bool {
        self.session.credential.is_ready()
    }

    /// Process one UI event
    ///
    /// Never fails; errors are rendered to `sink`.
    pub async fn handle(&mut self, event: ChatEvent, sink: &mut dyn RenderSink) {
        match event {
            ChatEvent::CredentialEntered(secret) => {
                self.credential_entered(&secret, sink);
            }
            ChatEvent::UserSubmitted(text) => {
                if let Err(e) = self.submit(&text, sink).await {
                    report(sink, &e);
                }
            }
            ChatEvent::ClearRequested => self.clear(sink),
        }
    }

    /// Bind an API key for this session
    ///
    /// Returns `true` when a provider is ready afterwards.
    pub fn credential_entered(&mut self, secret: &str, sink: &mut dyn RenderSink) -> bool {
        configure_credential(&mut self.session.credential, secret, sink)
    }

    /// Send a user message and append the reply
    ///
    /// # Errors
    ///
    /// * input error for an empty message (nothing appended)
    /// * credential error when no key is configured (nothing appended)
    /// * remote error when the provider call fails (user turn stays appended)
    pub async fn submit(&mut self, text: &str, sink: &mut dyn RenderSink) -> Result<String> {
        if text.trim().is_empty() {
            return Err(ChatflowError::Input("Message cannot be empty".to_string()).into());
        }

        let provider = self.session.credential.provider()?;

        self.session.conversation.push_user(text);
        sink.conversation_changed(&self.session.conversation);

        tracing::debug!(
            "Submitting chat turn: {} messages in history",
            self.session.conversation.len()
        );

        let reply = provider
            .generate(self.session.conversation.messages(), &self.options)
            .await
            .map_err(|e| {
                tracing::warn!("Chat request failed, keeping user turn: {}", e);
                e
            })?;

        self.session.conversation.push_assistant(reply.as_str());
        sink.plain_text(&reply);
        sink.conversation_changed(&self.session.conversation);

        Ok(reply)
    }

    /// Discard the whole history
    pub fn clear(&mut self, sink: &mut dyn RenderSink) {
        let removed = self.session.conversation.len();
        self.session.conversation.clear();
        tracing::info!("Cleared chat history ({} messages)", removed);
        sink.notice("Chat history cleared");
        sink.conversation_changed(&self.session.conversation);
    }
}
