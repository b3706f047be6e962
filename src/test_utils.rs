//! Test utilities for chatflow
//!
//! Temporary config files, a recording render sink, and provider factory
//! helpers shared by the unit tests.

use crate::error::Result;
use crate::providers::{Provider, ProviderFactory};
use crate::render::RenderSink;
use crate::session::{Conversation, DocumentState};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Write `content` to a `config.yaml` inside a fresh temporary directory
///
/// Keep the returned `TempDir` alive for as long as the path is used.
pub fn temp_config_file(content: &str) -> (TempDir, PathBuf) {
    let dir = temp_dir();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, content).expect("Failed to write test config");
    (dir, path)
}

/// Assert that a result is an error whose message contains `expected`
pub fn assert_error_contains<T>(result: Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = e.to_string();
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

/// A complete configuration file exercising every section
pub fn test_config_yaml() -> String {
    r#"
provider:
  type: anthropic
  anthropic:
    api_base: http://localhost:8080
    api_version: "2023-06-01"
    timeout_seconds: 30

chat:
  model: claude-3-haiku-20240307
  max_tokens: 512

workflow:
  model: claude-3-opus-20240229
  max_tokens: 2048
  temperature: 0.2
"#
    .to_string()
}

/// A factory that hands out the same provider for any secret
pub fn factory_returning(provider: Arc<dyn Provider>) -> ProviderFactory {
    Arc::new(move |_secret: &str| -> Result<Arc<dyn Provider>> {
        Ok(Arc::clone(&provider))
    })
}

/// Render sink that records everything it is given
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub texts: Vec<String>,
    pub values: Vec<Value>,
    pub errors: Vec<String>,
    pub notices: Vec<String>,
    pub conversation_changes: usize,
    pub last_conversation_len: Option<usize>,
    pub document_changes: usize,
}

impl RenderSink for RecordingSink {
    fn plain_text(&mut self, text: &str) {
        self.texts.push(text.to_string());
    }

    fn json(&mut self, value: &Value) {
        self.values.push(value.clone());
    }

    fn error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn conversation_changed(&mut self, conversation: &Conversation) {
        self.conversation_changes += 1;
        self.last_conversation_len = Some(conversation.len());
    }

    fn document_changed(&mut self, _document: &DocumentState) {
        self.document_changes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChatflowError;

    #[test]
    fn test_temp_config_file_is_written() {
        let (_dir, path) = temp_config_file("chat:\n  max_tokens: 1\n");
        assert!(path.exists());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "chat:\n  max_tokens: 1\n"
        );
    }

    #[test]
    fn test_assert_error_contains_success() {
        let result: Result<()> = Err(ChatflowError::Config("test error message".to_string()).into());
        assert_error_contains(result, "test error");
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        assert_error_contains(Ok(()), "error");
    }

    #[test]
    fn test_recording_sink_counts_changes() {
        let mut sink = RecordingSink::default();
        sink.conversation_changed(&Conversation::new());
        sink.notice("done");
        assert_eq!(sink.conversation_changes, 1);
        assert_eq!(sink.last_conversation_len, Some(0));
        assert_eq!(sink.notices, vec!["done".to_string()]);
    }
}
