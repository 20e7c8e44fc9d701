//! String-keyed persistence media.
//!
//! A medium is the slot the workout store writes its serialized record into.
//! It knows nothing about workouts: values are opaque strings and every write
//! replaces the whole value stored under a key.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A string-keyed storage slot backend.
pub trait StorageMedium {
    /// Read the value stored under `key`, or `None` if nothing is stored.
    fn get_item(&self, key: &str) -> Result<Option<String>, MediumError>;

    /// Replace the value stored under `key`.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), MediumError>;

    /// Remove the value stored under `key`. Removing a missing key succeeds.
    fn remove_item(&mut self, key: &str) -> Result<(), MediumError>;
}

/// Errors raised by a storage medium.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediumError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage quota exceeded: {needed} bytes requested, {available} bytes available")]
    QuotaExceeded { needed: usize, available: usize },

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Medium backed by one JSON file per key inside a directory.
///
/// Writes go to a hidden temporary file that is synced and then renamed over
/// the target, so a reader sees either the old value or the new one.
#[derive(Debug, Clone)]
pub struct FileMedium {
    dir: PathBuf,
}

impl FileMedium {
    /// Create a file medium rooted at `dir`. The directory is created lazily
    /// on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the stored values.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file that holds `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, MediumError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }

    fn temp_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{}.json.tmp", key))
    }
}

impl StorageMedium for FileMedium {
    fn get_item(&self, key: &str) -> Result<Option<String>, MediumError> {
        let path = self.path_for(key)?;

        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MediumError::IoError(e.to_string())),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), MediumError> {
        let path = self.path_for(key)?;

        fs::create_dir_all(&self.dir).map_err(|e| MediumError::Unavailable(e.to_string()))?;

        let tmp_path = self.temp_path_for(key);
        let write_tmp = || -> std::io::Result<()> {
            let mut tmp_file = File::create(&tmp_path)?;
            tmp_file.write_all(value.as_bytes())?;
            tmp_file.sync_all()
        };

        if let Err(e) = write_tmp() {
            let _ = fs::remove_file(&tmp_path);
            return Err(map_write_error(e));
        }

        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            map_write_error(e)
        })
    }

    fn remove_item(&mut self, key: &str) -> Result<(), MediumError> {
        let path = self.path_for(key)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MediumError::IoError(e.to_string())),
        }
    }
}

/// In-process medium, used for tests and for hosts without device storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryMedium {
    items: HashMap<String, String>,
    quota_bytes: Option<usize>,
    available: bool,
}

impl MemoryMedium {
    /// Create an empty, unbounded medium.
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            quota_bytes: None,
            available: true,
        }
    }

    /// Create a medium that rejects writes once the stored values would
    /// exceed `quota_bytes` in total.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::new()
        }
    }

    /// Create a medium that fails every call, like a render context with no
    /// device storage attached.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Toggle availability.
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Store a raw value without quota checks (for seeding tests).
    pub fn insert_raw(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }

    /// Total bytes currently stored.
    pub fn used_bytes(&self) -> usize {
        self.items.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn check_available(&self) -> Result<(), MediumError> {
        if self.available {
            Ok(())
        } else {
            Err(MediumError::Unavailable(
                "no storage attached to this context".to_string(),
            ))
        }
    }
}

impl StorageMedium for MemoryMedium {
    fn get_item(&self, key: &str) -> Result<Option<String>, MediumError> {
        self.check_available()?;
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), MediumError> {
        self.check_available()?;

        if let Some(quota) = self.quota_bytes {
            let replaced = self.items.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            let needed = key.len() + value.len();
            let available = quota.saturating_sub(self.used_bytes() - replaced);
            if needed > available {
                return Err(MediumError::QuotaExceeded { needed, available });
            }
        }

        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), MediumError> {
        self.check_available()?;
        self.items.remove(key);
        Ok(())
    }
}

fn validate_key(key: &str) -> Result<(), MediumError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(MediumError::InvalidKey(key.to_string()))
    }
}

fn map_write_error(e: std::io::Error) -> MediumError {
    match e.kind() {
        std::io::ErrorKind::StorageFull | std::io::ErrorKind::QuotaExceeded => {
            MediumError::QuotaExceeded {
                needed: 0,
                available: 0,
            }
        }
        _ => MediumError::IoError(e.to_string()),
    }
}
