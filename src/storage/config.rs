//! Store configuration.
//!
//! Loaded from `config.toml` in the application data directory. A missing
//! file means defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Storage key the workout record is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "workout-storage";

/// Active workouts older than this many hours are treated as abandoned.
pub const DEFAULT_STALE_WORKOUT_HOURS: u32 = 6;

/// Rest period, in seconds, used for new rest timers.
pub const DEFAULT_REST_SECONDS: u32 = 150;

/// Workout store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Key of the slot holding the serialized record
    pub storage_key: String,
    /// Threshold after which an open session is force-completed
    pub stale_workout_hours: u32,
    /// Duration of rest timers started when a set is completed
    pub default_rest_seconds: u32,
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            stale_workout_hours: DEFAULT_STALE_WORKOUT_HOURS,
            default_rest_seconds: DEFAULT_REST_SECONDS,
            data_dir: PathBuf::new(),
        }
    }
}

impl StoreConfig {
    /// Stale threshold in milliseconds.
    pub fn stale_after_ms(&self) -> i64 {
        i64::from(self.stale_workout_hours) * 60 * 60 * 1000
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "setlog", "SetLog")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load configuration from the default location.
pub fn load_config() -> Result<StoreConfig, ConfigError> {
    load_config_from(&get_config_path(), get_data_dir())
}

/// Load configuration from `path`, attaching `data_dir` to the result.
pub fn load_config_from(path: &Path, data_dir: PathBuf) -> Result<StoreConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(StoreConfig {
            data_dir,
            ..Default::default()
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let mut config: StoreConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    if config.storage_key.trim().is_empty() {
        return Err(ConfigError::ParseError(
            "storage_key must not be empty".to_string(),
        ));
    }

    config.data_dir = data_dir;

    Ok(config)
}

/// Save configuration to `path`.
pub fn save_config(config: &StoreConfig, path: &Path) -> Result<(), ConfigError> {
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
