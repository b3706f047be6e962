//! Conversation history for chat sessions
//!
//! An ordered, append-only list of messages. The only destructive operation
//! is a full [`Conversation::clear`].

use crate::providers::{Message, Role};

/// Ordered chat history owned by one session
///
/// The list does not enforce user/assistant alternation; the chat controller
/// is what appends a user turn and, only on success, the assistant reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Creates an empty conversation
    ///
    /// # Examples
    ///
    /// ```
    /// use chatflow::session::Conversation;
    ///
    /// let conversation = Conversation::new();
    /// assert!(conversation.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a user message
    ///
    /// # Examples
    ///
    /// ```
    /// use chatflow::session::Conversation;
    ///
    /// let mut conversation = Conversation::new();
    /// conversation.push_user("Hello, assistant!");
    /// assert_eq!(conversation.len(), 1);
    /// ```
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    /// Appends an assistant message
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    /// Removes every message
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// All messages in order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether there are no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recent message, if any
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages with the given role
    pub fn count_role(&self, role: Role) -> usize {
        self.messages.iter().filter(|m| m.role == role).count()
    }

    /// Rough token estimate for the whole history
    ///
    /// Uses characters / 4, which approximates common tokenizers for English
    /// text. Only used for status display.
    pub fn estimated_tokens(&self) -> usize {
        self.messages
            .iter()
            .map(|m| estimate_tokens(&m.content))
            .sum()
    }
}

/// Estimate tokens in a string (characters / 4, rounded up)
fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}
