//! Rendering sink for session output
//!
//! Controllers never print directly. They hand text, JSON values, errors and
//! state-change notifications to a [`RenderSink`], which the terminal UI
//! implements with colored output.

use crate::providers::{Message, Role};
use crate::session::{Conversation, DocumentState};
use colored::Colorize;
use serde_json::Value;

/// Destination for everything a controller wants the user to see
pub trait RenderSink {
    /// Model reply or other plain text
    fn plain_text(&mut self, text: &str);

    /// A JSON value such as a proposed workflow
    fn json(&mut self, value: &Value);

    /// A user-visible error; the session stays usable
    fn error(&mut self, message: &str);

    /// A short confirmation such as "API key configured"
    fn notice(&mut self, message: &str);

    /// Called after every conversation mutation
    fn conversation_changed(&mut self, _conversation: &Conversation) {}

    /// Called after every document mutation
    fn document_changed(&mut self, _document: &DocumentState) {}
}

/// Colored terminal output on stdout/stderr
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl TerminalRenderer {
    /// Create a terminal renderer
    pub fn new() -> Self {
        Self
    }

    /// Print the whole conversation, oldest first
    pub fn show_conversation(&self, conversation: &Conversation) {
        if conversation.is_empty() {
            println!("{}", "(no messages yet)".dimmed());
            return;
        }
        for message in conversation.messages() {
            println!("{}\n", format_message(message));
        }
    }

    /// Print the current document and any pending proposal
    pub fn show_document(&self, document: &DocumentState) {
        match document.current() {
            Some(current) => {
                println!("{}", "Current workflow:".bold());
                println!("{}\n", format_json(current));
            }
            None => println!("{}", "(no workflow loaded)".dimmed()),
        }

        if let Some(proposed) = document.proposed() {
            println!("{}", "Proposed workflow (use /accept to apply):".bold().yellow());
            println!("{}\n", format_json(proposed));
        }
    }
}

impl RenderSink for TerminalRenderer {
    fn plain_text(&mut self, text: &str) {
        println!("\n{}\n", text);
    }

    fn json(&mut self, value: &Value) {
        println!("\n{}\n", format_json(value));
    }

    fn error(&mut self, message: &str) {
        eprintln!("{}\n", format!("Error: {}", message).red());
    }

    fn notice(&mut self, message: &str) {
        println!("{}\n", message.green());
    }
}

/// Format one chat message with a colored role label
pub fn format_message(message: &Message) -> String {
    let label = match message.role {
        Role::User => "you".cyan().bold(),
        Role::Assistant => "assistant".green().bold(),
    };
    format!("{}: {}", label, message.content)
}

/// Pretty-print a JSON value
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_message_includes_role_and_content() {
        let text = format_message(&Message::user("hi there"));
        assert!(text.contains("you"));
        assert!(text.ends_with("hi there"));

        let text = format_message(&Message::assistant("hello"));
        assert!(text.contains("assistant"));
    }

    #[test]
    fn test_format_json_is_pretty() {
        let text = format_json(&json!({"steps": [1, 2]}));
        assert!(text.contains('\n'));
        assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), json!({"steps": [1, 2]}));
    }
}
