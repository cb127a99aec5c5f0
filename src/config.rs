use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const CONFIG_ENV_VAR: &str = "PLAYDECK_CONFIG";
const CONFIG_FILE_NAME: &str = "config.json";

/// Startup settings. Every field has a default, so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Text placed in the URL field at startup. Nothing loads until the user confirms it.
    pub initial_url_input: String,
    /// How often the engine reports progress.
    pub progress_interval_ms: u64,
    pub probe_timeout_secs: u64,
    pub probe_cache_capacity: usize,
    pub window_title: String,
    pub pip_window_size: [f32; 2],
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            initial_url_input: String::new(),
            progress_interval_ms: 1000,
            probe_timeout_secs: 5,
            probe_cache_capacity: 32,
            window_title: "playdeck".to_string(),
            pip_window_size: [480.0, 270.0],
        }
    }
}

impl PlayerConfig {
    /// Reads a config file. A missing file yields the defaults.
    pub fn load_from_file(path: &Path) -> Result<PlayerConfig, ConfigError> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(PlayerConfig::default());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads from `$PLAYDECK_CONFIG` or the platform config directory. Any
    /// failure is logged and the defaults are used instead.
    pub fn load_or_default() -> PlayerConfig {
        let Some(path) = config_path() else {
            return PlayerConfig::default();
        };
        match PlayerConfig::load_from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring config file");
                PlayerConfig::default()
            }
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }
    directories::ProjectDirs::from("", "", "playdeck")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
