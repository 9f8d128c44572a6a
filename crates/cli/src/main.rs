//! GChat CLI: main entry point.
//!
//! Commands:
//! - `ask`      : Send one prompt (with optional memory, document, system text)
//! - `chat`     : Interactive session
//! - `models`   : List models offered by the service
//! - `doctor`   : Diagnose configuration and connectivity
//! - `onboard`  : Write a default config file
//! - `config`   : Show, locate or validate the configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "gchat",
    about = "GChat — prompt assembly and chat completion",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a single prompt and print the reply
    Ask {
        /// The prompt text (may be omitted when a file is given)
        prompt: Option<String>,

        /// System instructions sent ahead of the prompt
        #[arg(short, long)]
        system: Option<String>,

        /// Short-term memory text placed before the document and prompt
        #[arg(short, long)]
        memory: Option<String>,

        /// Plain-text or PDF document to include
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Declared content type of the document (inferred from the extension otherwise)
        #[arg(long, requires = "file")]
        content_type: Option<String>,

        /// Speak the reply with the configured speech backend
        #[arg(long)]
        speak: bool,
    },

    /// Start an interactive session
    Chat {
        /// Initial system instructions
        #[arg(short, long)]
        system: Option<String>,
    },

    /// List models available from the configured service
    Models,

    /// Diagnose configuration and service reachability
    Doctor,

    /// Write a default configuration file
    Onboard,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (credential redacted)
    Show,
    /// Print the config file location
    Path,
    /// Check the configuration for errors
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Ask {
            prompt,
            system,
            memory,
            file,
            content_type,
            speak,
        } => {
            commands::ask::run(commands::ask::AskArgs {
                prompt,
                system,
                memory,
                file,
                content_type,
                speak,
            })
            .await?
        }
        Commands::Chat { system } => commands::chat::run(system).await?,
        Commands::Models => commands::models::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
            ConfigAction::Validate => commands::config_cmd::validate().await?,
        },
    }

    Ok(())
}
