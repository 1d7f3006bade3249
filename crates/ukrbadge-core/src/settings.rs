//! Overlay settings persisted as a JSON object.
//!
//! The file only ever holds keys that exist in the defaults; anything else
//! is refused by `set` and dropped by `load`.

use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "user_settings.json";

pub fn defaults() -> Map<String, Value> {
    let value = json!({
        "badgeType": "full",
        "badgePosition": "top-right",
        "offsetX": 10,
        "offsetY": 10,
    });
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// `~/.local/share/ukrbadge/user_settings.json`
pub fn default_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ukrbadge")?;
    Ok(xdg_dirs.place_data_file(SETTINGS_FILE)?)
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::new(default_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored values merged over the defaults. A missing or unreadable file yields the defaults.
    pub fn load(&self) -> Map<String, Value> {
        let mut settings = defaults();
        if !self.path.exists() {
            return settings;
        }
        match self.read_file() {
            Ok(stored) => {
                for (key, value) in stored {
                    if let Some(slot) = settings.get_mut(&key) {
                        *slot = value;
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "ignoring settings file: {:#}", e);
            }
        }
        settings
    }

    /// Stores one value. Returns `Ok(false)` without touching the file for unknown keys.
    pub fn set(&self, key: &str, value: Value) -> Result<bool> {
        let mut settings = self.load();
        let Some(slot) = settings.get_mut(key) else {
            tracing::debug!(%key, "rejecting unknown setting");
            return Ok(false);
        };
        *slot = value;
        self.write_file(&settings)?;
        tracing::info!(%key, "setting saved");
        Ok(true)
    }

    fn read_file(&self) -> Result<Map<String, Value>> {
        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("read settings: {}", self.path.display()))?;
        let map: Map<String, Value> = serde_json::from_str(&data)
            .with_context(|| format!("parse settings: {}", self.path.display()))?;
        Ok(map)
    }

    fn write_file(&self, settings: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, data)
            .with_context(|| format!("write settings: {}", self.path.display()))?;
        Ok(())
    }
}
