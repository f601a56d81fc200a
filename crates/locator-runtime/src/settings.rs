//! Persisted overlay preferences.
//!
//! Storage is best effort: any failure to read or write falls back to in-memory
//! values and is only logged.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::editor::EditorProtocol;

pub const HIGHLIGHT_ENABLED_KEY: &str = "cts_highlight_enabled";
pub const EDITOR_PROTOCOL_KEY: &str = "cts_editor_protocol";
pub const MODIFIER_LOCATION_KEY: &str = "cts_modifier_location";

/// `KeyboardEvent.location` of a left-side modifier
pub const KEY_LOCATION_LEFT: u32 = 1;
/// `KeyboardEvent.location` of a right-side modifier
pub const KEY_LOCATION_RIGHT: u32 = 2;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// String key/value storage that survives page reloads
pub trait SettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Process-lifetime storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage that always fails, as with disabled or private-mode browser storage
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl SettingsStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("storage is disabled".to_string()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("storage is disabled".to_string()))
    }
}

/// JSON object on disk, one string value per key
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read_all(&self) -> Result<HashMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }
}

impl SettingsStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&values)?)?;
        Ok(())
    }
}

/// Which physical side of the keyboard activates the overlay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierLocation {
    Any,
    #[default]
    Left,
    Right,
}

impl ModifierLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Whether a key event with the given location code should be honored
    pub fn matches(&self, key_location: u32) -> bool {
        match self {
            Self::Any => true,
            Self::Left => key_location == KEY_LOCATION_LEFT,
            Self::Right => key_location == KEY_LOCATION_RIGHT,
        }
    }
}

impl fmt::Display for ModifierLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModifierLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(Self::Any),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(format!("unknown modifier location '{}'", other)),
        }
    }
}

/// Preferences read once when the controller is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub highlight_enabled: bool,
    pub editor_protocol: EditorProtocol,
    pub modifier_location: ModifierLocation,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            highlight_enabled: true,
            editor_protocol: EditorProtocol::default(),
            modifier_location: ModifierLocation::default(),
        }
    }
}

impl Settings {
    /// Reads every preference, substituting defaults for missing, invalid or
    /// unreadable values
    pub fn load(store: &dyn SettingsStore) -> Self {
        let defaults = Self::default();
        Self {
            highlight_enabled: read(store, HIGHLIGHT_ENABLED_KEY)
                .map(|value| value == "true")
                .unwrap_or(defaults.highlight_enabled),
            editor_protocol: read(store, EDITOR_PROTOCOL_KEY)
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.editor_protocol),
            modifier_location: read(store, MODIFIER_LOCATION_KEY)
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.modifier_location),
        }
    }
}

fn read(store: &dyn SettingsStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(key, error = %e, "Settings storage read failed, using default");
            None
        }
    }
}

/// Writes a preference, logging instead of failing
pub(crate) fn write(store: &mut dyn SettingsStore, key: &str, value: &str) {
    if let Err(e) = store.set(key, value) {
        tracing::debug!(key, error = %e, "Settings storage write failed, keeping value in memory");
    }
}
