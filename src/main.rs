//! chatflow - chat and workflow editing sessions with a hosted LLM
//!
#![doc = "Main entry point for the chatflow application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chatflow::cli::{Cli, Commands};
use chatflow::commands;
use chatflow::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Chat { model, api_key } => {
            if let Some(m) = &model {
                tracing::debug!("Using model override: {}", m);
            }
            commands::chat::run_chat(config, api_key).await?;
            Ok(())
        }
        Commands::Workflow {
            model,
            api_key,
            file,
        } => {
            if let Some(m) = &model {
                tracing::debug!("Using model override: {}", m);
            }
            if let Some(path) = &file {
                tracing::debug!("Loading workflow from: {}", path.display());
            }
            commands::workflow::run_workflow(config, api_key, file).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so they never interleave with model output on stdout.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "chatflow=debug"
    } else {
        "chatflow=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
