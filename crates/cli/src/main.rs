//! Life Admin Concierge CLI, the main entry point.
//!
//! Commands:
//! - `chat`     Interactive session (default)
//! - `ask`      Answer a single message
//! - `demo`     Run the scripted demo queries
//! - `status`   Show system status
//! - `tools`    List available tools
//! - `tool`     Run one tool with JSON arguments
//! - `summary`  End-of-day summary
//! - `eval`     Run the evaluation suite
//! - `doctor`   Diagnose configuration
//! - `onboard`  Write the default config file

use clap::{Parser, Subcommand};
use concierge_config::{AppConfig, ConfigError, LoggingConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "concierge",
    about = "Life Admin Concierge: renewals, reminders, drafts and daily planning",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to a config file (default: ~/.concierge/config.toml)
    #[arg(long, global = true, env = "CONCIERGE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the concierge
    Chat {
        /// Let the model call tools directly (requires an API key)
        #[arg(long)]
        tools: bool,
    },

    /// Send a single message and print the reply
    Ask {
        #[arg(short, long)]
        message: String,

        /// Let the model call tools directly (requires an API key)
        #[arg(long)]
        tools: bool,

        /// Print the full structured record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Walk through the demo queries
    Demo {
        /// Don't wait for Enter between queries
        #[arg(long)]
        no_pause: bool,
    },

    /// Show system status
    Status,

    /// List available tools
    Tools,

    /// Run a single tool
    Tool {
        /// Tool name, e.g. get_profile_info
        name: String,

        /// Arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },

    /// End-of-day summary of completed and pending tasks
    Summary {
        /// Completed tasks (comma separated)
        #[arg(long, value_delimiter = ',')]
        done: Vec<String>,

        /// Pending tasks (comma separated)
        #[arg(long, value_delimiter = ',')]
        pending: Vec<String>,
    },

    /// Run the evaluation suite
    Eval {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose configuration and credentials
    Doctor,

    /// Initialize the config file
    Onboard,
}

fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => AppConfig::load_with_env(path),
        None => AppConfig::load(),
    }
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.with_target(false).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref());
    let logging = config.as_ref().map(|c| c.logging.clone()).unwrap_or_default();
    init_tracing(&logging, cli.verbose);
    match &config {
        Ok(c) => tracing::debug!(model = %c.model, demo_mode = !c.has_api_key(), "Configuration loaded"),
        Err(e) => tracing::error!(error = %e, "Failed to load configuration"),
    }

    match cli.command.unwrap_or(Commands::Chat { tools: false }) {
        Commands::Doctor => commands::doctor::run(cli.config.as_deref()).await?,
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Chat { tools } => commands::chat::run(config?, tools).await?,
        Commands::Ask { message, tools, json } => commands::ask::run(config?, &message, tools, json).await?,
        Commands::Demo { no_pause } => commands::demo::run(config?, !no_pause).await?,
        Commands::Status => commands::status::run(config?).await?,
        Commands::Tools => commands::tools::list(config?).await?,
        Commands::Tool { name, args } => commands::tools::run(config?, &name, &args).await?,
        Commands::Summary { done, pending } => commands::summary::run(config?, done, pending).await?,
        Commands::Eval { json } => commands::eval::run(config?, json).await?,
    }

    Ok(())
}
