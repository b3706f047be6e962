//! chatflow - chat and workflow editing sessions with a hosted LLM
//!
//! This library provides the core of the `chatflow` CLI: per-session state,
//! the controllers that turn user events into provider calls, and the
//! Anthropic Messages API client.
//!
//! # Architecture
//!
//! - `session`: credential gate, chat history and two-phase workflow document
//! - `controller`: event handlers for chat and workflow sessions
//! - `providers`: text-generation provider abstraction and Anthropic client
//! - `prompts`: system instructions and request templates for workflows
//! - `render`: output sink trait and terminal renderer
//! - `commands`: interactive rustyline loops
//! - `config`: configuration loading and validation
//! - `error`: error types and result alias
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use chatflow::config::Config;
//! use chatflow::controller::{ChatController, ChatEvent};
//! use chatflow::providers::factory_from_config;
//! use chatflow::render::TerminalRenderer;
//! use chatflow::session::ChatSession;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let session = ChatSession::new(factory_from_config(&config.provider));
//!     let mut chat = ChatController::new(session, config.chat.generation_options());
//!     let mut out = TerminalRenderer::new();
//!
//!     chat.handle(ChatEvent::CredentialEntered("sk-ant-...".into()), &mut out).await;
//!     chat.handle(ChatEvent::UserSubmitted("hi".into()), &mut out).await;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod prompts;
pub mod providers;
pub mod render;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use controller::{ChatController, ChatEvent, WorkflowController, WorkflowEvent};
pub use error::{ChatflowError, ErrorKind, Result};
pub use render::RenderSink;

#[cfg(test)]
pub mod test_utils;
