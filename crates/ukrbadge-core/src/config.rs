use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::classify::Markers;
use crate::fetch::FetchOptions;
use crate::score::ScoringConfig;
use crate::search::SearchConfig;

pub const DEFAULT_BASE_URL: &str = "https://kuli.com.ua";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Catalog host and request settings (`[catalog]` section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Scheme and host of the catalog, e.g. `https://kuli.com.ua`.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Cap on a single response body.
    pub max_body_bytes: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_body_bytes: 4 * 1024 * 1024,
        }
    }
}

impl CatalogConfig {
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
            user_agent: self.user_agent.clone(),
            max_body_bytes: self.max_body_bytes,
            ..FetchOptions::default()
        }
    }
}

/// Batch validation settings (`[batch]` section).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Pause between consecutive titles, to stay under the catalog's rate limits.
    pub request_delay_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 500,
        }
    }
}

impl BatchConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// Global configuration loaded from `~/.config/ukrbadge/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeConfig {
    pub catalog: CatalogConfig,
    pub search: SearchConfig,
    pub markers: Markers,
    pub scoring: ScoringConfig,
    pub batch: BatchConfig,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ukrbadge")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<BadgeConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = BadgeConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit file. Missing sections and keys take defaults.
pub fn load_from(path: &Path) -> Result<BadgeConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: BadgeConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
