//! Special commands parser for interactive sessions
//!
//! Chat and workflow sessions accept `/`-prefixed commands in addition to
//! free text. Command words are case-insensitive; their arguments (API keys,
//! paths, prompts) are passed through unchanged.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an argument it does not take
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Commands available in a chat session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Configure the API key for this session
    SetKey(String),
    /// Clear the chat history
    Clear,
    /// Print the chat history
    History,
    /// Show session status
    Status,
    /// Show help
    Help,
    /// Leave the session
    Exit,
    /// Not a command; send the input as a chat message
    None,
}

/// Commands available in a workflow session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowCommand {
    /// Configure the API key for this session
    SetKey(String),
    /// Load a workflow JSON file
    Load(PathBuf),
    /// Print the current workflow and any pending proposal
    Show,
    /// Ask a question about the workflow
    Analyze(String),
    /// Request a change to the workflow
    Modify(String),
    /// Apply the pending proposal
    Accept,
    /// Drop the pending proposal
    Discard,
    /// Write the current workflow to a file
    Export(PathBuf),
    /// Show session status
    Status,
    /// Show help
    Help,
    /// Leave the session
    Exit,
    /// Not a command; treated as an analysis request
    None,
}

/// Split `/word rest` into a lowercase command word and the untouched rest
fn split_command(input: &str) -> (String, &str) {
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word.to_lowercase(), rest.trim()),
        None => (input.to_lowercase(), ""),
    }
}

fn is_exit(input: &str) -> bool {
    matches!(input.to_lowercase().as_str(), "exit" | "quit" | "/exit" | "/quit")
}

fn required_arg<'a>(command: &str, arg: &'a str, usage: &str) -> Result<&'a str, CommandError> {
    if arg.is_empty() {
        Err(CommandError::MissingArgument {
            command: command.to_string(),
            usage: usage.to_string(),
        })
    } else {
        Ok(arg)
    }
}

fn no_arg<T>(command: &str, arg: &str, value: T) -> Result<T, CommandError> {
    if arg.is_empty() {
        Ok(value)
    } else {
        Err(CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: arg.to_string(),
        })
    }
}

/// Parse a line entered in a chat session
///
/// # Errors
///
/// Returns `CommandError` for an unknown `/` command or a bad argument.
///
/// # Examples
///
/// ```
/// use chatflow::commands::special_commands::{parse_chat_command, ChatCommand};
///
/// assert_eq!(parse_chat_command("/CLEAR").unwrap(), ChatCommand::Clear);
/// assert_eq!(
///     parse_chat_command("/key sk-ant-Abc").unwrap(),
///     ChatCommand::SetKey("sk-ant-Abc".to_string())
/// );
/// assert_eq!(parse_chat_command("hello there").unwrap(), ChatCommand::None);
/// assert!(parse_chat_command("/foo").is_err());
/// ```
pub fn parse_chat_command(input: &str) -> Result<ChatCommand, CommandError> {
    let trimmed = input.trim();
    if is_exit(trimmed) {
        return Ok(ChatCommand::Exit);
    }
    if !trimmed.starts_with('/') {
        return Ok(ChatCommand::None);
    }

    let (command, arg) = split_command(trimmed);
    match command.as_str() {
        "/key" => {
            required_arg("/key", arg, "/key <api-key>").map(|k| ChatCommand::SetKey(k.to_string()))
        }
        "/clear" => no_arg("/clear", arg, ChatCommand::Clear),
        "/history" => no_arg("/history", arg, ChatCommand::History),
        "/status" => no_arg("/status", arg, ChatCommand::Status),
        "/help" | "/?" => no_arg("/help", arg, ChatCommand::Help),
        _ => Err(CommandError::UnknownCommand(command)),
    }
}

/// Parse a line entered in a workflow session
///
/// # Errors
///
/// Returns `CommandError` for an unknown `/` command or a bad argument.
///
/// # Examples
///
/// ```
/// use chatflow::commands::special_commands::{parse_workflow_command, WorkflowCommand};
/// use std::path::PathBuf;
///
/// assert_eq!(
///     parse_workflow_command("/load flows/Build.json").unwrap(),
///     WorkflowCommand::Load(PathBuf::from("flows/Build.json"))
/// );
/// assert_eq!(
///     parse_workflow_command("/modify Add a lint step").unwrap(),
///     WorkflowCommand::Modify("Add a lint step".to_string())
/// );
/// assert_eq!(parse_workflow_command("what does it do?").unwrap(), WorkflowCommand::None);
/// ```
pub fn parse_workflow_command(input: &str) -> Result<WorkflowCommand, CommandError> {
    let trimmed = input.trim();
    if is_exit(trimmed) {
        return Ok(WorkflowCommand::Exit);
    }
    if !trimmed.starts_with('/') {
        return Ok(WorkflowCommand::None);
    }

    let (command, arg) = split_command(trimmed);
    match command.as_str() {
        "/key" => required_arg("/key", arg, "/key <api-key>")
            .map(|k| WorkflowCommand::SetKey(k.to_string())),
        "/load" | "/upload" => required_arg("/load", arg, "/load <path>")
            .map(|p| WorkflowCommand::Load(PathBuf::from(p))),
        "/show" => no_arg("/show", arg, WorkflowCommand::Show),
        "/analyze" | "/ask" => required_arg("/analyze", arg, "/analyze <question>")
            .map(|p| WorkflowCommand::Analyze(p.to_string())),
        "/modify" => required_arg("/modify", arg, "/modify <requested change>")
            .map(|p| WorkflowCommand::Modify(p.to_string())),
        "/accept" => no_arg("/accept", arg, WorkflowCommand::Accept),
        "/discard" => no_arg("/discard", arg, WorkflowCommand::Discard),
        "/export" => required_arg("/export", arg, "/export <path>")
            .map(|p| WorkflowCommand::Export(PathBuf::from(p))),
        "/status" => no_arg("/status", arg, WorkflowCommand::Status),
        "/help" | "/?" => no_arg("/help", arg, WorkflowCommand::Help),
        _ => Err(CommandError::UnknownCommand(command)),
    }
}

/// Print help for chat sessions
pub fn print_chat_help() {
    println!(
        r#"
Chat Session Commands
=====================

  /key <api-key>  - Configure the API key for this session
  /clear          - Clear the chat history
  /history        - Show the chat history
  /status         - Show session status
  /help, /?       - Show this help message
  exit, quit      - Leave the session

Any other input is sent to the model as a chat message.
The API key is kept in memory only and never written to history.
"#
    );
}

/// Print help for workflow sessions
pub fn print_workflow_help() {
    println!(
        r#"
Workflow Session Commands
=========================

  /key <api-key>      - Configure the API key for this session
  /load <path>        - Load a workflow JSON file (replaces the current one)
  /show               - Show the current workflow and any pending proposal
  /analyze <question> - Ask about the workflow (does not change it)
  /modify <change>    - Ask for a modified workflow (stored as a proposal)
  /accept             - Apply the pending proposal
  /discard            - Drop the pending proposal
  /export <path>      - Write the current workflow to a file
  /status             - Show session status
  /help, /?           - Show this help message
  exit, quit          - Leave the session

Any other input is treated as /analyze.
"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_commands_are_case_insensitive() {
        assert_eq!(parse_chat_command("/Clear").unwrap(), ChatCommand::Clear);
        assert_eq!(parse_chat_command("/HISTORY").unwrap(), ChatCommand::History);
        assert_eq!(parse_chat_command("  /status  ").unwrap(), ChatCommand::Status);
        assert_eq!(parse_chat_command("/?").unwrap(), ChatCommand::Help);
    }

    #[test]
    fn test_exit_aliases() {
        for input in ["exit", "QUIT", "/exit", "/quit"] {
            assert_eq!(parse_chat_command(input).unwrap(), ChatCommand::Exit);
            assert_eq!(parse_workflow_command(input).unwrap(), WorkflowCommand::Exit);
        }
    }

    #[test]
    fn test_key_argument_keeps_case() {
        assert_eq!(
            parse_chat_command("/KEY sk-ant-MixedCase").unwrap(),
            ChatCommand::SetKey("sk-ant-MixedCase".to_string())
        );
    }

    #[test]
    fn test_key_requires_argument() {
        let err = parse_chat_command("/key").unwrap_err();
        assert!(matches!(err, CommandError::MissingArgument { .. }));
        assert!(err.to_string().contains("/key <api-key>"));
    }

    #[test]
    fn test_unsupported_argument() {
        assert_eq!(
            parse_chat_command("/clear all").unwrap_err(),
            CommandError::UnsupportedArgument {
                command: "/clear".to_string(),
                arg: "all".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse_workflow_command("/frobnicate").unwrap_err(),
            CommandError::UnknownCommand("/frobnicate".to_string())
        );
        assert!(parse_chat_command("/modify x").is_err());
    }

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(parse_chat_command("tell me a joke").unwrap(), ChatCommand::None);
        assert_eq!(
            parse_workflow_command("why is step 2 slow?").unwrap(),
            WorkflowCommand::None
        );
    }

    #[test]
    fn test_workflow_commands_with_arguments() {
        assert_eq!(
            parse_workflow_command("/analyze Which step deploys?").unwrap(),
            WorkflowCommand::Analyze("Which step deploys?".to_string())
        );
        assert_eq!(
            parse_workflow_command("/export out/Flow.json").unwrap(),
            WorkflowCommand::Export(PathBuf::from("out/Flow.json"))
        );
        assert_eq!(
            parse_workflow_command("/upload a.json").unwrap(),
            WorkflowCommand::Load(PathBuf::from("a.json"))
        );
        assert!(matches!(
            parse_workflow_command("/modify").unwrap_err(),
            CommandError::MissingArgument { .. }
        ));
    }

    #[test]
    fn test_workflow_commands_without_arguments() {
        assert_eq!(parse_workflow_command("/accept").unwrap(), WorkflowCommand::Accept);
        assert_eq!(parse_workflow_command("/Discard").unwrap(), WorkflowCommand::Discard);
        assert_eq!(parse_workflow_command("/show").unwrap(), WorkflowCommand::Show);
        assert!(parse_workflow_command("/accept now").is_err());
    }
}
