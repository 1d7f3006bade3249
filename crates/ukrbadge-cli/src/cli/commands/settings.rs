//! `ukrbadge settings get|set` – overlay settings file.

use anyhow::{bail, Result};
use serde_json::Value;
use ukrbadge_core::settings::SettingsStore;

pub fn run_settings_get() -> Result<()> {
    let store = SettingsStore::open_default()?;
    let settings = store.load();
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

pub fn run_settings_set(key: &str, raw: &str) -> Result<()> {
    let store = SettingsStore::open_default()?;
    if !store.set(key, parse_value(raw))? {
        bail!("unknown setting: {}", key);
    }
    println!("Saved {key} to {}", store.path().display());
    Ok(())
}

/// `10` → number, `"x"`/`true` → JSON, anything else → plain string.
pub(crate) fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
