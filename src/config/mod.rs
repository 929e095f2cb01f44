//! Configuration module for dorkscope
//!
//! Handles loading settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

/// Load settings from the first file found, falling back to defaults.
///
/// `DORKSCOPE_SETTINGS_PATH` is checked before the default locations.
pub fn load() -> Result<Settings> {
    let mut candidates = Vec::new();
    if let Ok(path) = std::env::var("DORKSCOPE_SETTINGS_PATH") {
        candidates.push(PathBuf::from(path));
    }
    candidates.extend([
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        PathBuf::from("/etc/dorkscope/settings.yml"),
    ]);
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("dorkscope/settings.yml"));
    }

    let mut settings = match candidates.iter().find(|p| p.exists()) {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            Settings::from_file(path)?
        }
        None => {
            info!("No settings file found, using defaults");
            Settings::default()
        }
    };
    settings.merge_env();
    Ok(settings)
}
