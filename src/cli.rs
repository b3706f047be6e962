//! Command-line interface definition for chatflow
//!
//! This module defines the CLI structure using clap's derive API,
//! providing the `chat` and `workflow` interactive sessions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// chatflow - chat and workflow editing sessions with a hosted LLM
///
/// Each invocation starts one interactive session. Session state lives only
/// for the lifetime of the process.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatflow")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for chatflow
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive multi-turn chat session
    Chat {
        /// Override the configured model for this session
        #[arg(short, long)]
        model: Option<String>,

        /// API key to configure at startup
        #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// Start an interactive workflow analysis and modification session
    Workflow {
        /// Override the configured model for this session
        #[arg(short, long)]
        model: Option<String>,

        /// API key to configure at startup
        #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// JSON workflow file to load at startup
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            command: Commands::Chat {
                model: None,
                api_key: None,
            },
        }
    }
}
