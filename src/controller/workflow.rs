//! Workflow session controller
//!
//! Analysis is read-only. Modification stores a proposal that only replaces
//! the current document on an explicit accept. A failed call of either kind
//! leaves the document state exactly as it was.

use crate::controller::{configure_credential, report};
use crate::error::{ChatflowError, Result};
use crate::prompts::{
    build_analysis_request, build_modification_request, ANALYST_SYSTEM_PROMPT,
    MODIFIER_SYSTEM_PROMPT,
};
use crate::providers::{GenerationOptions, Message, Provider};
use crate::render::RenderSink;
use crate::session::{DocumentState, WorkflowSession};
use serde_json::Value;
use std::sync::Arc;

/// Events a workflow UI can raise
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    /// The user entered an API key
    CredentialEntered(String),
    /// The user uploaded a workflow file
    FileUploaded(Vec<u8>),
    /// The user asked a question about the workflow
    AnalyzeRequested(String),
    /// The user asked for a change to the workflow
    ModifyRequested(String),
    /// The user accepted the pending proposal
    AcceptRequested,
    /// The user rejected the pending proposal
    DiscardRequested,
}

/// Drives one workflow session
#[derive(Debug)]
pub struct WorkflowController {
    session: WorkflowSession,
    options: GenerationOptions,
}

impl WorkflowController {
    /// Create a controller for `session`
    pub fn new(session: WorkflowSession, options: GenerationOptions) -> Self {
        Self { session, options }
    }

    /// The session state
    pub fn session(&self) -> &WorkflowSession {
        &self.session
    }

    /// The document state
    pub fn document(&self) -> &DocumentState {
        &self.session.document
    }

    /// Base generation options; the system instruction is set per request
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
    pub async fn handle(&mut self, event: WorkflowEvent, sink: &mut dyn RenderSink) {
        let result = match event {
            WorkflowEvent::CredentialEntered(secret) => {
                self.credential_entered(&secret, sink);
                Ok(())
            }
            WorkflowEvent::FileUploaded(bytes) => self.upload(&bytes, sink),
            WorkflowEvent::AnalyzeRequested(prompt) => self.analyze(&prompt, sink).await.map(|_| ()),
            WorkflowEvent::ModifyRequested(prompt) => self.modify(&prompt, sink).await.map(|_| ()),
            WorkflowEvent::AcceptRequested => self.accept(sink),
            WorkflowEvent::DiscardRequested => {
                self.discard(sink);
                Ok(())
            }
        };

        if let Err(e) = result {
            report(sink, &e);
        }
    }

    /// Bind an API key for this session
    ///
    /// Returns `true` when a provider is ready afterwards.
    pub fn credential_entered(&mut self, secret: &str, sink: &mut dyn RenderSink) -> bool {
        configure_credential(&mut self.session.credential, secret, sink)
    }

    /// Replace the current document with an uploaded payload
    ///
    /// # Errors
    ///
    /// Returns an input error if the payload is not valid JSON; the previous
    /// document and any pending proposal are kept in that case.
    pub fn upload(&mut self, bytes: &[u8], sink: &mut dyn RenderSink) -> Result<()> {
        let loaded = self.session.document.load_bytes(bytes)?;
        tracing::info!("Loaded workflow ({} bytes)", bytes.len());

        sink.notice("Workflow loaded successfully");
        sink.json(loaded);
        sink.document_changed(&self.session.document);
        Ok(())
    }

    /// Ask the model a question about the current document
    ///
    /// The document state is never modified.
    pub async fn analyze(&self, prompt: &str, sink: &mut dyn RenderSink) -> Result<String> {
        let (provider, request) = self.prepare(prompt, build_analysis_request)?;
        let options = self.options.clone().with_system(ANALYST_SYSTEM_PROMPT);

        tracing::debug!("Requesting workflow analysis");
        let reply = provider.generate(&request, &options).await?;

        sink.plain_text(&reply);
        Ok(reply)
    }

    /// Ask the model for a modified document and store it as a proposal
    ///
    /// # Errors
    ///
    /// Returns a parse error if the reply is not a single JSON value. Nothing
    /// is stored and any earlier proposal is kept.
    pub async fn modify(&mut self, prompt: &str, sink: &mut dyn RenderSink) -> Result<Value> {
        let (provider, request) = self.prepare(prompt, build_modification_request)?;
        let options = self.options.clone().with_system(MODIFIER_SYSTEM_PROMPT);

        tracing::debug!("Requesting workflow modification");
        let reply = provider.generate(&request, &options).await?;

        let value: Value = serde_json::from_str(&reply).map_err(|e| {
            tracing::debug!("Unparseable modification reply ({} chars)", reply.len());
            ChatflowError::Parse(format!("Model response is not valid JSON: {}", e))
        })?;

        let proposed = self.session.document.propose(value).clone();
        sink.notice("Proposed modification (use /accept to apply or /discard to drop):");
        sink.json(&proposed);
        sink.document_changed(&self.session.document);
        Ok(proposed)
    }

    /// Commit the pending proposal
    ///
    /// # Errors
    ///
    /// Returns an input error when there is no proposal
    pub fn accept(&mut self, sink: &mut dyn RenderSink) -> Result<()> {
        self.session.document.accept()?;
        tracing::info!("Accepted proposed workflow");

        sink.notice("Changes accepted");
        sink.document_changed(&self.session.document);
        Ok(())
    }

    /// Drop the pending proposal
    ///
    /// Returns `true` if there was one.
    pub fn discard(&mut self, sink: &mut dyn RenderSink) -> bool {
        match self.session.document.discard() {
            Some(_) => {
                sink.notice("Proposed changes discarded");
                sink.document_changed(&self.session.document);
                true
            }
            None => {
                sink.notice("No proposed changes to discard");
                false
            }
        }
    }

    /// Check preconditions shared by analyze and modify and build the request
    fn prepare(
        &self,
        prompt: &str,
        build: fn(&str, &str) -> String,
    ) -> Result<(Arc<dyn Provider>, Vec<Message>)> {
        if prompt.trim().is_empty() {
            return Err(ChatflowError::Input("Request cannot be empty".to_string()).into());
        }

        let provider = self.session.credential.provider()?;
        let workflow_json = self.session.document.serialized_current()?;

        Ok((provider, vec![Message::user(build(&workflow_json, prompt))]))
    }
}
