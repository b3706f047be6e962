//! Interaction controllers
//!
//! A controller owns one session's state and processes one UI event at a
//! time. Every handler takes `&mut self`, so two provider calls can never be
//! in flight for the same session. Errors are converted into render calls at
//! the point they occur; the session always stays usable.

pub mod chat;
pub mod workflow;

pub use chat::{ChatController, ChatEvent};
pub use workflow::{WorkflowController, WorkflowEvent};

use crate::error::error_kind;
use crate::render::RenderSink;
use crate::session::{CredentialHolder, CredentialStatus};

/// Bind a credential and report the outcome to the sink
///
/// Returns `true` when a provider is bound for `secret` afterwards.
fn configure_credential(
    holder: &mut CredentialHolder,
    secret: &str,
    sink: &mut dyn RenderSink,
) -> bool {
    match holder.set(secret) {
        Ok(CredentialStatus::Configured) => {
            sink.notice("API key configured successfully!");
            true
        }
        Ok(CredentialStatus::Unchanged) => true,
        Err(e) => {
            sink.error(&format!("Error initializing client: {}", e));
            false
        }
    }
}

/// Render an error from a failed event
fn report(sink: &mut dyn RenderSink, err: &anyhow::Error) {
    tracing::debug!(kind = ?error_kind(err), "Event failed: {}", err);
    sink.error(&err.to_string());
}
