/*!
Command handlers for the CLI

This module provides the interactive session loops invoked by the CLI
entrypoint:

- `chat`: free-form multi-turn chat
- `workflow`: load, analyze and modify a JSON workflow document

Both loops read lines with rustyline, turn them into controller events and
render the results on the terminal.
*/

use crate::config::Config;
use crate::error::{ChatflowError, Result};
use crate::providers::factory_from_config;
use crate::render::TerminalRenderer;
use crate::session::SessionInfo;
use anyhow::Context;
use colored::Colorize;
use std::path::Path;

// Special commands parser
pub mod special_commands;

/// Print the banner shown when a session starts
fn print_welcome_banner(title: &str, ready: bool) {
    println!("\n{}", "=".repeat(64));
    println!("  {}", title.bold());
    println!("{}\n", "=".repeat(64));
    if !ready {
        println!(
            "{}",
            "No API key configured. Use '/key <api-key>' before sending requests.".yellow()
        );
    }
    println!("Type '/help' for available commands, 'exit' to quit\n");
}

fn readiness(ready: bool) -> colored::ColoredString {
    if ready {
        "ready".green()
    } else {
        "no API key".yellow()
    }
}

fn print_session_header(info: &SessionInfo, model: &str, ready: bool) {
    println!("\n{}", "Session Status".bold());
    println!("{}", "-".repeat(14));
    println!("Session:      {}", info.id);
    println!(
        "Started:      {}",
        info.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("Model:        {}", model);
    println!("Provider:     {}", readiness(ready));
}

/// Read a workflow file for upload
///
/// # Errors
///
/// Returns an input error naming the path if the file cannot be read
pub fn read_workflow_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        ChatflowError::Input(format!("Failed to read {}: {}", path.display(), e)).into()
    })
}

/// Write the current workflow document as pretty JSON
///
/// # Errors
///
/// Returns an input error if nothing is loaded, or an I/O error naming the
/// path if the file cannot be written
pub fn export_workflow(document: &crate::session::DocumentState, path: &Path) -> Result<()> {
    let json = document.serialized_current()?;
    std::fs::write(path, json + "\n")
        .map_err(ChatflowError::Io)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

// Chat command handler
pub mod chat {
    //! Interactive chat session
    //!
    //! Every non-command line is submitted as a user message; the whole
    //! history is sent with each request.

    use super::*;
    use crate::commands::special_commands::{parse_chat_command, print_chat_help, ChatCommand};
    use crate::controller::{ChatController, ChatEvent};
    use crate::render::RenderSink;
    use crate::session::ChatSession;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start an interactive chat session
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `api_key` - Optional API key to configure before the first prompt
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the terminal
    /// cannot be initialized. Request failures are shown and never end the
    /// session.
    pub async fn run_chat(config: Config, api_key: Option<String>) -> Result<()> {
        config.validate()?;
        tracing::info!("Starting chat session");

        let factory = factory_from_config(&config.provider);
        let mut controller = ChatController::new(
            ChatSession::new(factory),
            config.chat.generation_options(),
        );
        let mut renderer = TerminalRenderer::new();

        if let Some(key) = api_key {
            controller.credential_entered(&key, &mut renderer);
        }

        let mut rl = DefaultEditor::new()?;
        print_welcome_banner("Chatflow Chat Session", controller.is_ready());

        loop {
            match rl.readline(&format!("{} ", "chat>".cyan().bold())) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    let command = match parse_chat_command(trimmed) {
                        Ok(command) => command,
                        Err(e) => {
                            renderer.error(&e.to_string());
                            continue;
                        }
                    };

                    if !matches!(command, ChatCommand::SetKey(_)) {
                        rl.add_history_entry(trimmed)?;
                    }

                    match command {
                        ChatCommand::SetKey(key) => {
                            controller
                                .handle(ChatEvent::CredentialEntered(key), &mut renderer)
                                .await;
                        }
                        ChatCommand::Clear => {
                            controller
                                .handle(ChatEvent::ClearRequested, &mut renderer)
                                .await;
                        }
                        ChatCommand::History => renderer.show_conversation(controller.conversation()),
                        ChatCommand::Status => print_status_display(&controller),
                        ChatCommand::Help => print_chat_help(),
                        ChatCommand::Exit => break,
                        ChatCommand::None => {
                            controller
                                .handle(ChatEvent::UserSubmitted(trimmed.to_string()), &mut renderer)
                                .await;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn print_status_display(controller: &ChatController) {
        let conversation = controller.conversation();
        print_session_header(
            &controller.session().info,
            &controller.options().model,
            controller.is_ready(),
        );
        println!("Messages:     {}", conversation.len());
        println!("Est. tokens:  ~{}", conversation.estimated_tokens());
        println!();
    }

}

// Workflow command handler
pub mod workflow {
    //! Interactive workflow session
    //!
    //! One JSON document is loaded at a time. Free text is treated as an
    //! analysis question; modifications are held as proposals until
    //! accepted.

    use super::*;
    use crate::commands::special_commands::{
        parse_workflow_command, print_workflow_help, WorkflowCommand,
    };
    use crate::controller::{WorkflowController, WorkflowEvent};
    use crate::render::RenderSink;
    use crate::session::WorkflowSession;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use std::path::PathBuf;

    /// Start an interactive workflow session
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `api_key` - Optional API key to configure before the first prompt
    /// * `file` - Optional workflow file to load at startup
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the terminal
    /// cannot be initialized.
    pub async fn run_workflow(
        config: Config,
        api_key: Option<String>,
        file: Option<PathBuf>,
    ) -> Result<()> {
        config.validate()?;
        tracing::info!("Starting workflow session");

        let factory = factory_from_config(&config.provider);
        let mut controller = WorkflowController::new(
            WorkflowSession::new(factory),
            config.workflow.generation_options(),
        );
        let mut renderer = TerminalRenderer::new();

        if let Some(key) = api_key {
            controller.credential_entered(&key, &mut renderer);
        }

        print_welcome_banner("Chatflow Workflow Session", controller.is_ready());

        if let Some(path) = file {
            load_file(&mut controller, &path, &mut renderer).await;
        }

        let mut rl = DefaultEditor::new()?;

        loop {
            match rl.readline(&format!("{} ", "workflow>".magenta().bold())) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    let command = match parse_workflow_command(trimmed) {
                        Ok(command) => command,
                        Err(e) => {
                            renderer.error(&e.to_string());
                            continue;
                        }
                    };

                    if !matches!(command, WorkflowCommand::SetKey(_)) {
                        rl.add_history_entry(trimmed)?;
                    }

                    let event = match command {
                        WorkflowCommand::SetKey(key) => WorkflowEvent::CredentialEntered(key),
                        WorkflowCommand::Load(path) => {
                            load_file(&mut controller, &path, &mut renderer).await;
                            continue;
                        }
                        WorkflowCommand::Show => {
                            renderer.show_document(controller.document());
                            continue;
                        }
                        WorkflowCommand::Analyze(prompt) => WorkflowEvent::AnalyzeRequested(prompt),
                        WorkflowCommand::Modify(prompt) => WorkflowEvent::ModifyRequested(prompt),
                        WorkflowCommand::Accept => WorkflowEvent::AcceptRequested,
                        WorkflowCommand::Discard => WorkflowEvent::DiscardRequested,
                        WorkflowCommand::Export(path) => {
                            match export_workflow(controller.document(), &path) {
                                Ok(()) => renderer
                                    .notice(&format!("Workflow written to {}", path.display())),
                                Err(e) => renderer.error(&format!("{:#}", e)),
                            }
                            continue;
                        }
                        WorkflowCommand::Status => {
                            print_status_display(&controller);
                            continue;
                        }
                        WorkflowCommand::Help => {
                            print_workflow_help();
                            continue;
                        }
                        WorkflowCommand::Exit => break,
                        WorkflowCommand::None => WorkflowEvent::AnalyzeRequested(trimmed.to_string()),
                    };

                    controller.handle(event, &mut renderer).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    async fn load_file(
        controller: &mut WorkflowController,
        path: &std::path::Path,
        renderer: &mut TerminalRenderer,
    ) {
        match read_workflow_file(path) {
            Ok(bytes) => {
                controller
                    .handle(WorkflowEvent::FileUploaded(bytes), renderer)
                    .await
            }
            Err(e) => renderer.error(&e.to_string()),
        }
    }

    fn print_status_display(controller: &WorkflowController) {
        let document = controller.document();
        print_session_header(
            &controller.session().info,
            &controller.options().model,
            controller.is_ready(),
        );
        println!(
            "Workflow:     {}",
            if document.is_loaded() { "loaded" } else { "none" }
        );
        println!(
            "Proposal:     {}",
            if document.proposed().is_some() {
                "pending (use /accept or /discard)"
            } else {
                "none"
            }
        );
        println!();
    }

}
