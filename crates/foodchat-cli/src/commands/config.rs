//! Configuration management commands.

use std::path::{Path, PathBuf};

use clap::Args;
use foodchat_core::config::Config;
use foodchat_core::paths;

/// Config command arguments.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(clap::Subcommand)]
pub enum ConfigCommand {
    /// Show configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key (dot-separated path)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Value to set
        value: String,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration
    Validate,
}

fn resolve_path(config_path: Option<&Path>) -> anyhow::Result<PathBuf> {
    match config_path {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(paths::config_file()?),
    }
}

/// Look up a dot-separated key in a JSON value.
pub fn get_path<'a>(json: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
    key.split('.')
        .try_fold(json, |value, part| value.get(part))
}

/// Set a dot-separated key, creating intermediate objects as needed.
///
/// `raw` is parsed as JSON first so numbers and booleans keep their type, and
/// falls back to a plain string.
pub fn set_path(json: &mut serde_json::Value, key: &str, raw: &str) {
    let parsed: serde_json::Value = serde_json::from_str(raw)
        .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));

    let parts: Vec<&str> = key.split('.').collect();
    let mut current = json;
    for (i, part) in parts.iter().enumerate() {
        if i == parts.len() - 1 {
            current[*part] = parsed;
            return;
        }
        if !current.get(*part).map_or(false, |v| v.is_object()) {
            current[*part] = serde_json::json!({});
        }
        current = &mut current[*part];
    }
}

/// Run the config command.
pub async fn run(args: ConfigArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = Config::load_or_default_from(config_path);
            println!("{}", config.to_json5()?);
        }

        ConfigCommand::Get { key } => {
            let config = Config::load_or_default_from(config_path);
            let json = serde_json::to_value(&config)?;

            match get_path(&json, &key) {
                Some(v) => println!("{}", serde_json::to_string_pretty(v)?),
                None => anyhow::bail!("Key not found: {}", key),
            }
        }

        ConfigCommand::Set { key, value } => {
            let path = resolve_path(config_path)?;
            let config = Config::load_for_update(&path)
                .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path.display(), e))?;
            let mut json = serde_json::to_value(&config)?;
            set_path(&mut json, &key, &value);

            // Round-trip through Config to reject values of the wrong shape
            let updated: Config = serde_json::from_value(json)
                .map_err(|e| anyhow::anyhow!("Invalid configuration after set: {}", e))?;
            updated
                .validate()
                .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
            updated.save(&path)?;

            println!("Set {} = {}", key, value);
        }

        ConfigCommand::Init { force } => {
            let path = resolve_path(config_path)?;

            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists: {:?}. Use --force to overwrite.",
                    path
                );
            }

            Config::default().save(&path)?;
            println!("Created config file: {:?}", path);
        }

        ConfigCommand::Path => {
            let path = resolve_path(config_path)?;
            println!("{}", path.display());
        }

        ConfigCommand::Validate => {
            let path = resolve_path(config_path)?;
            match Config::load(&path) {
                Ok(config) => match config.validate() {
                    Ok(_) => println!("Configuration is valid"),
                    Err(e) => anyhow::bail!("Configuration error: {}", e),
                },
                Err(e) => anyhow::bail!("Failed to load config: {}", e),
            }
        }
    }

    Ok(())
}
