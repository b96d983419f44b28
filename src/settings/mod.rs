//! Persisted converter settings.
//!
//! The last-used direction, indentation style and choice policy survive
//! restarts through a [`SettingsStore`]. Settings are stored as JSON:
//!
//! ```text
//! {
//!   "direction": "XmlToSchema",
//!   "indentation": "TwoSpaces",
//!   "choicePolicy": "AllAlternatives"
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::base::{ConversionDirection, IndentationStyle};
use crate::convert::ConvertOptions;
use crate::sample::ChoicePolicy;

/// Configuration inputs of the pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConverterSettings {
    pub direction: ConversionDirection,
    pub indentation: IndentationStyle,
    pub choice_policy: ChoicePolicy,
}

impl ConverterSettings {
    pub fn options(&self) -> ConvertOptions {
        ConvertOptions {
            indentation: self.indentation,
            choice_policy: self.choice_policy,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where settings are read from on startup and written to on change.
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<ConverterSettings, SettingsError>;
    fn save(&self, settings: &ConverterSettings) -> Result<(), SettingsError>;
}

/// Settings kept in memory only.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: Mutex<ConverterSettings>,
}

impl MemorySettingsStore {
    pub fn new(settings: ConverterSettings) -> Self {
        Self {
            settings: Mutex::new(settings),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<ConverterSettings, SettingsError> {
        Ok(*self.settings.lock())
    }

    fn save(&self, settings: &ConverterSettings) -> Result<(), SettingsError> {
        *self.settings.lock() = *settings;
        Ok(())
    }
}

/// Settings in a JSON file. A missing file loads as the defaults.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<ConverterSettings, SettingsError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no settings file, using defaults");
                Ok(ConverterSettings::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, settings: &ConverterSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(settings)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let store = JsonSettingsStore::new(dir.path().join("settings.json"));
        assert_eq!(store.load().unwrap(), ConverterSettings::default());
    }

    #[test]
    fn test_json_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = JsonSettingsStore::new(dir.path().join("nested").join("settings.json"));
        let settings = ConverterSettings {
            direction: ConversionDirection::SchemaToXml,
            indentation: IndentationStyle::OneTab,
            choice_policy: ChoicePolicy::FirstAlternative,
        };
        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), settings);

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.contains(r#""choicePolicy": "FirstAlternative""#), "{text}");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "indentation": "FourSpaces" }"#).unwrap();

        let settings = JsonSettingsStore::new(&path).load().unwrap();
        assert_eq!(settings.indentation, IndentationStyle::FourSpaces);
        assert_eq!(settings.direction, ConversionDirection::XmlToSchema);
    }

    #[test]
    fn test_unknown_indentation_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "indentation": "ThreeSpaces" }"#).unwrap();

        let err = JsonSettingsStore::new(&path).load().unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn test_memory_store() {
        let store = MemorySettingsStore::default();
        let settings = ConverterSettings {
            indentation: IndentationStyle::FourSpaces,
            ..Default::default()
        };
        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), settings);
    }
}
