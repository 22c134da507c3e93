//! FoodChat command-line interface.

pub mod commands;

use clap::{Parser, Subcommand};

/// FoodChat - encrypted API key vault
#[derive(Parser)]
#[command(name = "foodchat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long, env = "FOODCHAT_CONFIG", global = true)]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Manage the encrypted API key
    Key(commands::key::KeyArgs),

    /// Configuration management
    Config(commands::config::ConfigArgs),

    /// Show version information
    Version,
}

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Key(args) => commands::key::run(args, config_path).await,
        Commands::Config(args) => commands::config::run(args, config_path).await,
        Commands::Version => {
            println!("foodchat {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
