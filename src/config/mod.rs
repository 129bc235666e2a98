// Configuration management for aulos
// Handles loading/saving settings, with sensible defaults when config is missing

use anyhow::Result;
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub music_directories: Vec<PathBuf>,
    pub audio: AudioSettings,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Startup volume, 0.0 to 1.0.
    pub volume: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub show_notifications: bool,
    pub notification_duration_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            music_directories: vec![
                dirs::audio_dir().unwrap_or_else(|| PathBuf::from("~/Music")),
            ],
            audio: AudioSettings { volume: 0.7 },
            ui: UiConfig {
                show_notifications: true,
                notification_duration_ms: 3000,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(config_path, content)?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("aulos");

        Ok(config_dir.join("config.toml"))
    }
}
