use async_trait::async_trait;
use chatflow::error::{ChatflowError, Result};
use chatflow::providers::{GenerationOptions, Message, Provider, ProviderFactory};
use chatflow::render::RenderSink;
use chatflow::session::{Conversation, DocumentState};
use serde_json::Value;
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// One request seen by a [`ScriptedProvider`]
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub messages: Vec<Message>,
    pub options: GenerationOptions,
}

/// Provider that replays queued replies and records every request
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

#[allow(dead_code)]
impl ScriptedProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, text: &str) {
        self.replies.lock().unwrap().push_back(Ok(text.to_string()));
    }

    pub fn fail(&self, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn generate(&self, messages: &[Message], options: &GenerationOptions) -> Result<String> {
        self.requests.lock().unwrap().push(RecordedRequest {
            messages: messages.to_vec(),
            options: options.clone(),
        });

        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(ChatflowError::Remote(message).into()),
            None => Err(ChatflowError::Remote("no scripted reply".to_string()).into()),
        }
    }
}

/// Factory that binds every secret to `provider`, counting calls
#[allow(dead_code)]
pub fn scripted_factory(provider: Arc<ScriptedProvider>) -> ProviderFactory {
    Arc::new(move |secret: &str| -> Result<Arc<dyn Provider>> {
        if secret.trim().is_empty() {
            return Err(ChatflowError::Credential("API key cannot be empty".to_string()).into());
        }
        let provider: Arc<dyn Provider> = provider.clone();
        Ok(provider)
    })
}

/// Render sink that records everything it is given
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub texts: Vec<String>,
    pub values: Vec<Value>,
    pub errors: Vec<String>,
    pub notices: Vec<String>,
    pub conversation_lens: Vec<usize>,
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
        self.conversation_lens.push(conversation.len());
    }

    fn document_changed(&mut self, _document: &DocumentState) {
        self.document_changes += 1;
    }
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
