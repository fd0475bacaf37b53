//! Configuration loading for Revisa.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. User config (`~/.revisa/config.toml`)
//! 3. Defaults (lowest priority)
//!
//! All configuration is optional. The system runs with sensible defaults
//! when no config exists.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RevisaError, Result};
use crate::storage::traits::is_valid_slot_key;

/// Default slot key holding the study records.
pub const DEFAULT_DATA_KEY: &str = "revisoesPMMG_v3";

/// Default slot key holding the theme preference.
pub const DEFAULT_THEME_KEY: &str = "temaPMMG";

/// Default strftime format for checkpoint labels (dd/mm/yyyy).
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Main configuration struct for Revisa.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Slot storage configuration.
    pub storage: StorageConfig,
    /// Rendering configuration.
    pub display: DisplayConfig,
}

/// Slot storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for slot files. Defaults to `<revisa_home>/slots`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slots_dir: Option<PathBuf>,
    /// Slot key for the study records.
    pub data_key: String,
    /// Slot key for the theme preference.
    pub theme_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            slots_dir: None,
            data_key: DEFAULT_DATA_KEY.to_string(),
            theme_key: DEFAULT_THEME_KEY.to_string(),
        }
    }
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// strftime format used for checkpoint date labels.
    pub date_format: String,
}

impl DisplayConfig {
    /// Check that a strftime format string parses and can render a calendar
    /// date. Time and time-zone fields have nothing to format and are rejected.
    pub fn is_valid_date_format(format: &str) -> bool {
        use chrono::format::{Item, StrftimeItems};
        use std::fmt::Write;

        if format.is_empty() || StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return false;
        }

        let mut sample = String::new();
        write!(sample, "{}", NaiveDate::default().format(format)).is_ok()
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl Config {
    /// Load configuration with full precedence chain.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables
    /// 2. User config (`~/.revisa/config.toml`)
    /// 3. Defaults
    pub fn load() -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        config.apply_env_overrides();
        config
    }

    /// Load user config from `~/.revisa/config.toml`.
    fn load_user_config() -> Option<Config> {
        let path = revisa_home()?.join("config.toml");
        if !path.exists() {
            return None;
        }
        match Self::load_from_file(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!("ignoring {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Load config from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| RevisaError::storage(path, e))?;
        let config: Config =
            toml::from_str(&content).map_err(|e| RevisaError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break storage or rendering.
    pub fn validate(&self) -> Result<()> {
        for (name, key) in [
            ("storage.data_key", &self.storage.data_key),
            ("storage.theme_key", &self.storage.theme_key),
        ] {
            if !is_valid_slot_key(key) {
                return Err(RevisaError::config(format!(
                    "{} '{}' is not a valid slot key",
                    name, key
                )));
            }
        }

        if self.storage.data_key == self.storage.theme_key {
            return Err(RevisaError::config(
                "storage.data_key and storage.theme_key must differ",
            ));
        }

        if !DisplayConfig::is_valid_date_format(&self.display.date_format) {
            return Err(RevisaError::config(format!(
                "display.date_format '{}' is not a valid strftime format",
                self.display.date_format
            )));
        }

        Ok(())
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // REVISA_SLOTS_DIR
        if let Ok(val) = env::var("REVISA_SLOTS_DIR") {
            if val.is_empty() {
                tracing::warn!("REVISA_SLOTS_DIR is empty, ignoring");
            } else {
                self.storage.slots_dir = Some(PathBuf::from(val));
            }
        }

        // REVISA_DATA_KEY
        if let Ok(val) = env::var("REVISA_DATA_KEY") {
            if is_valid_slot_key(&val) && val != self.storage.theme_key {
                self.storage.data_key = val;
            } else {
                tracing::warn!(
                    "Invalid REVISA_DATA_KEY value '{}'. Using '{}'.",
                    val,
                    self.storage.data_key
                );
            }
        }

        // REVISA_DATE_FORMAT
        if let Ok(val) = env::var("REVISA_DATE_FORMAT") {
            if DisplayConfig::is_valid_date_format(&val) {
                self.display.date_format = val;
            } else {
                tracing::warn!(
                    "Invalid REVISA_DATE_FORMAT value '{}'. Using '{}'.",
                    val,
                    self.display.date_format
                );
            }
        }
    }

    /// Merge another config into this one.
    ///
    /// Values in `other` that differ from defaults override values in `self`.
    fn merge(mut self, other: Config) -> Self {
        let defaults = Config::default();

        if other.storage.slots_dir.is_some() {
            self.storage.slots_dir = other.storage.slots_dir;
        }
        if other.storage.data_key != defaults.storage.data_key {
            self.storage.data_key = other.storage.data_key;
        }
        if other.storage.theme_key != defaults.storage.theme_key {
            self.storage.theme_key = other.storage.theme_key;
        }
        if other.display.date_format != defaults.display.date_format {
            self.display.date_format = other.display.date_format;
        }

        self
    }

    /// Directory for slot files, honouring the `storage.slots_dir` override.
    pub fn slots_dir(&self) -> Option<PathBuf> {
        self.storage.slots_dir.clone().or_else(slots_dir)
    }
}

/// Get the Revisa home directory.
///
/// Checks `REVISA_HOME` first, then falls back to `~/.revisa`.
/// An empty `REVISA_HOME` is ignored.
pub fn revisa_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("REVISA_HOME") {
        if home.is_empty() {
            tracing::warn!("REVISA_HOME is empty, using default");
        } else {
            let path = PathBuf::from(&home);
            if path.is_absolute() {
                return Some(path);
            }
            if let Ok(canonical) = path.canonicalize() {
                return Some(canonical);
            }
            tracing::warn!("REVISA_HOME is relative and doesn't exist, using as-is");
            return Some(path);
        }
    }

    dirs::home_dir().map(|home| home.join(".revisa"))
}

/// Get the default slots directory.
///
/// Returns `<revisa_home>/slots/`.
pub fn slots_dir() -> Option<PathBuf> {
    revisa_home().map(|h| h.join("slots"))
}
