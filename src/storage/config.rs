//! Application configuration loaded from TOML.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application version
    pub version: String,
    /// SQLite activity store
    pub database_path: PathBuf,
    /// Dated athlete profile list (JSON)
    pub athlete_file: PathBuf,
    /// Directory scanned by `load`
    pub activity_dir: PathBuf,
    /// Report settings
    pub reports: ReportSettings,
    /// Remote metadata sync settings
    pub sync: SyncSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        let home = get_home_dir();
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            database_path: get_data_dir().join("fitpeaks.db"),
            athlete_file: home.join(".athlete.json"),
            activity_dir: home.join("Documents").join("Zwift").join("Activities"),
            reports: ReportSettings::default(),
            sync: SyncSettings::default(),
        }
    }
}

/// Report-related settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Colour terminal output
    pub color: bool,
    /// Days covered by the week report
    pub week_days: u32,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            color: true,
            week_days: 7,
        }
    }
}

/// Remote metadata sync settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Prefix stripped from remote activity names
    pub name_prefix: String,
    /// Minutes subtracted from the remote start time when matching rows
    pub start_slack_minutes: i64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            name_prefix: "Zwift - ".to_string(),
            start_slack_minutes: 5,
        }
    }
}

/// Get the data directory path.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "fitpeaks", "FitPeaks")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the user's home directory.
pub fn get_home_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the default configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load application configuration from the default location.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&get_config_path())
}

/// Load application configuration from `path`; a missing file yields defaults.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Save application configuration to `path`.
pub fn save_config(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
