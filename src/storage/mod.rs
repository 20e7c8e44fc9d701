//! Storage module for persistence media and configuration.

pub mod config;
pub mod medium;

pub use config::{load_config, load_config_from, save_config, ConfigError, StoreConfig};
pub use medium::{FileMedium, MediumError, MemoryMedium, StorageMedium};
