//! `ukrbadge serve` – plugin API on a Unix socket until Ctrl-C.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use ukrbadge_core::config::BadgeConfig;
use ukrbadge_core::plugin_api::{self, PluginApi};
use ukrbadge_core::settings::SettingsStore;
use ukrbadge_core::Resolver;

use crate::cli::plugin_socket;

pub async fn run_serve(cfg: &BadgeConfig, socket: Option<PathBuf>) -> Result<()> {
    let socket_path = match socket {
        Some(path) => path,
        None => plugin_api::default_socket_path()?,
    };
    let api = Arc::new(PluginApi::new(
        Resolver::from_config(cfg)?,
        SettingsStore::open_default()?,
    ));

    let handle = plugin_socket::spawn_plugin_listener(api, &socket_path)?;
    println!("Listening on {}", socket_path.display());

    tokio::signal::ctrl_c().await?;
    handle.abort();
    let _ = std::fs::remove_file(&socket_path);
    tracing::info!("plugin socket closed");
    Ok(())
}
