//! CLI for the ukrbadge resolver.

mod commands;
mod plugin_socket;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use ukrbadge_core::config::{self, BadgeConfig};

use commands::{run_resolve, run_serve, run_settings_get, run_settings_set, run_slug, run_validate};

/// Top-level CLI for the ukrbadge resolver.
#[derive(Debug, Parser)]
#[command(name = "ukrbadge")]
#[command(about = "ukrbadge: Ukrainian localization status of games on kuli.com.ua", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of ~/.config/ukrbadge/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print the canonical slug for a title (no network).
    Slug {
        /// Game or application title.
        title: String,
    },

    /// Resolve titles to a localization status and catalog URL.
    Resolve {
        /// One or more titles.
        #[arg(required = true)]
        titles: Vec<String>,
        /// Print one JSON object per line.
        #[arg(long)]
        json: bool,
    },

    /// Resolve a list of titles and print a summary.
    Validate {
        /// File with one title per line (blank lines and `#` comments ignored).
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
        /// Pause between titles in milliseconds (default from config).
        #[arg(long, value_name = "MS")]
        delay_ms: Option<u64>,
        /// Additional titles.
        titles: Vec<String>,
    },

    /// Serve the plugin API over a Unix socket (one JSON request per line).
    Serve {
        /// Socket path (default: ~/.local/state/ukrbadge/plugin.sock).
        #[arg(long, value_name = "PATH")]
        socket: Option<PathBuf>,
    },

    /// Show or change overlay settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Print the current settings as JSON.
    Get,
    /// Store one setting. VALUE is parsed as JSON, falling back to a plain string.
    Set { key: String, value: String },
}

fn load_config(path: Option<&Path>) -> Result<BadgeConfig> {
    let cfg = match path {
        Some(path) => config::load_from(path)?,
        None => config::load_or_init()?,
    };
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let config_path = cli.config.as_deref();

        match cli.command {
            CliCommand::Slug { title } => run_slug(&title),
            CliCommand::Resolve { titles, json } => {
                let cfg = load_config(config_path)?;
                run_resolve(&cfg, &titles, json).await?;
            }
            CliCommand::Validate {
                file,
                delay_ms,
                titles,
            } => {
                let cfg = load_config(config_path)?;
                run_validate(&cfg, file.as_deref(), delay_ms, titles).await?;
            }
            CliCommand::Serve { socket } => {
                let cfg = load_config(config_path)?;
                run_serve(&cfg, socket).await?;
            }
            CliCommand::Settings { action } => match action {
                SettingsAction::Get => run_settings_get()?,
                SettingsAction::Set { key, value } => run_settings_set(&key, &value)?,
            },
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
