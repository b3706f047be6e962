//! Per-session state
//!
//! A session is one interactive run. Its state (credential, conversation or
//! document) is owned by exactly one controller and dropped when the run ends.

pub mod conversation;
pub mod credential;
pub mod document;

pub use conversation::Conversation;
pub use credential::{Credential, CredentialHolder, CredentialStatus};
pub use document::DocumentState;

use crate::providers::ProviderFactory;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Identity and start time of a session, shown in status output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    /// Random session identifier
    pub id: Uuid,
    /// When the session was created
    pub started_at: DateTime<Utc>,
}

impl SessionInfo {
    /// Create info for a session starting now
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
        }
    }
}

impl Default for SessionInfo {
    fn default() -> Self {
        Self::new()
    }
}

/// State of one chat session
#[derive(Debug)]
pub struct ChatSession {
    /// Session identity
    pub info: SessionInfo,
    /// Credential gate
    pub credential: CredentialHolder,
    /// Chat history
    pub conversation: Conversation,
}

impl ChatSession {
    /// Start an empty chat session
    pub fn new(factory: ProviderFactory) -> Self {
        Self {
            info: SessionInfo::new(),
            credential: CredentialHolder::new(factory),
            conversation: Conversation::new(),
        }
    }
}

/// State of one workflow session
#[derive(Debug)]
pub struct WorkflowSession {
    /// Session identity
    pub info: SessionInfo,
    /// Credential gate
    pub credential: CredentialHolder,
    /// Workflow document
    pub document: DocumentState,
}

impl WorkflowSession {
    /// Start a workflow session with no document loaded
    pub fn new(factory: ProviderFactory) -> Self {
        Self {
            info: SessionInfo::new(),
            credential: CredentialHolder::new(factory),
            document: DocumentState::new(),
        }
    }
}
