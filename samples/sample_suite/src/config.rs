use std::fs;
use std::path::Path;

use serde::Deserialize;

use ils_connector::ConnectorConfig;
use ils_connector::config::{default_config_path, load_config};

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub connector: ConnectorConfig,
    /// Login name looked up by the search scenario, if any.
    #[serde(default)]
    pub sample_userid: Option<String>,
}

/// Read `settings.json` from the working directory, falling back to the
/// connector's own config file when it is absent.
pub fn load_settings() -> Result<Settings, String> {
    let mut path = std::env::current_dir().map_err(|e| e.to_string())?;
    path.push("settings.json");
    if path.exists() {
        return read_settings(&path);
    }

    let fallback = default_config_path().ok_or("No settings.json and no config directory")?;
    println!("settings.json not found, using {}", fallback.display());
    let connector = load_config(&fallback).map_err(|e| e.to_string())?;
    Ok(Settings {
        connector,
        sample_userid: None,
    })
}

fn read_settings(path: &Path) -> Result<Settings, String> {
    let contents =
        fs::read_to_string(path).map_err(|e| format!("Failed to read settings.json: {e}"))?;
    serde_json::from_str(&contents).map_err(|e| format!("Invalid settings.json: {e}"))
}
