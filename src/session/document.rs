//! Workflow document state
//!
//! Two-phase: a committed `current` document and an optional `proposed`
//! replacement produced by a modify request. The proposal only becomes the
//! current document on an explicit [`DocumentState::accept`].

use crate::error::{ChatflowError, Result};
use serde_json::Value;

/// The workflow document for one session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentState {
    current: Option<Value>,
    proposed: Option<Value>,
}

impl DocumentState {
    /// Creates a state with no document loaded
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an uploaded payload and make it the current document
    ///
    /// Replaces any existing document without confirmation and drops any
    /// pending proposal, since that proposal was made against the old one.
    ///
    /// # Errors
    ///
    /// Returns an input error if the payload is not valid JSON; the existing
    /// state is left untouched in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use chatflow::session::DocumentState;
    /// use serde_json::json;
    ///
    /// let mut state = DocumentState::new();
    /// state.load_bytes(br#"{"steps":[1,2]}"#).unwrap();
    /// assert_eq!(state.current(), Some(&json!({"steps": [1, 2]})));
    /// assert!(state.load_bytes(b"not json").is_err());
    /// assert_eq!(state.current(), Some(&json!({"steps": [1, 2]})));
    /// ```
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<&Value> {
        let value: Value = serde_json::from_slice(bytes).map_err(|e| {
            ChatflowError::Input(format!("Uploaded workflow is not valid JSON: {}", e))
        })?;

        if self.proposed.take().is_some() {
            tracing::debug!("Discarded pending proposal on new upload");
        }

        Ok(self.current.insert(value))
    }

    /// The committed document, if one is loaded
    pub fn current(&self) -> Option<&Value> {
        self.current.as_ref()
    }

    /// The committed document
    ///
    /// # Errors
    ///
    /// Returns an input error when nothing has been uploaded yet
    pub fn require_current(&self) -> Result<&Value> {
        self.current.as_ref().ok_or_else(|| {
            ChatflowError::Input("No workflow loaded; upload a workflow first".to_string()).into()
        })
    }

    /// Whether a document has been loaded
    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    /// The pending proposal, if any
    pub fn proposed(&self) -> Option<&Value> {
        self.proposed.as_ref()
    }

    /// Store a proposal, replacing any older one
    pub fn propose(&mut self, value: Value) -> &Value {
        self.proposed.insert(value)
    }

    /// Commit the pending proposal as the current document
    ///
    /// # Errors
    ///
    /// Returns an input error when there is no proposal to accept
    pub fn accept(&mut self) -> Result<&Value> {
        let proposed = self.proposed.take().ok_or_else(|| {
            ChatflowError::Input("No proposed modification to accept".to_string())
        })?;

        Ok(self.current.insert(proposed))
    }

    /// Drop the pending proposal, returning it
    pub fn discard(&mut self) -> Option<Value> {
        self.proposed.take()
    }

    /// Pretty-printed current document, as sent to the model
    ///
    /// # Errors
    ///
    /// Returns an input error when nothing has been uploaded yet
    pub fn serialized_current(&self) -> Result<String> {
        let current = self.require_current()?;
        serde_json::to_string_pretty(current)
            .map_err(|e| ChatflowError::Serialization(e).into())
    }
}
