use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, TuneForgeError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub autosave: AutosaveConfig,
    pub overlay: OverlayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub settings_dir: PathBuf,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    pub enabled: bool,
    pub interval_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub update_interval_secs: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| home.join(".local/share"))
            .join("tuneforge");

        Self {
            settings_dir: data_dir.join("Saved"),
            file_name: "Settings.json".to_string(),
        }
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: 30,
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            update_interval_secs: 0.1,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from the default location, writing a default file on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = AppConfig::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .ok_or_else(|| TuneForgeError::ConfigError("no config directory available".to_string()))?;
        Ok(base.join("tuneforge").join("config.toml"))
    }

    pub fn settings_path(&self) -> PathBuf {
        self.storage.settings_dir.join(&self.storage.file_name)
    }

    /// `None` when autosave is off or the interval is zero.
    pub fn autosave_interval(&self) -> Option<Duration> {
        (self.autosave.enabled && self.autosave.interval_secs > 0)
            .then(|| Duration::from_secs(self.autosave.interval_secs))
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = |expected: &'static str| TuneForgeError::InvalidValue {
            field: key.to_string(),
            expected,
        };
        match key {
            "storage.settings_dir" => self.storage.settings_dir = PathBuf::from(value),
            "storage.file_name" => self.storage.file_name = value.to_string(),
            "autosave.enabled" => {
                self.autosave.enabled = value.parse().map_err(|_| invalid("true or false"))?
            }
            "autosave.interval_secs" => {
                self.autosave.interval_secs = value.parse().map_err(|_| invalid("whole seconds"))?
            }
            "overlay.update_interval_secs" => {
                let secs: f32 = value.parse().map_err(|_| invalid("seconds"))?;
                if !(secs > 0.0) {
                    return Err(invalid("a positive number of seconds"));
                }
                self.overlay.update_interval_secs = secs;
            }
            "logging.level" => self.logging.level = value.to_string(),
            _ => return Err(TuneForgeError::ConfigError(format!("Unknown config key: {}", key))),
        }
        Ok(())
    }
}
