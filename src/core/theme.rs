//! Persisted theme preference.
//!
//! Only the stored value is managed here; applying it is up to whatever
//! front-end draws the list.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RevisaError, Result};
use crate::storage::SlotStore;

/// Light or dark presentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    /// Stored string value.
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    /// The other theme.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }

    /// Interpret a stored value. Only an exact `"dark"` selects dark.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => ThemePreference::Dark,
            _ => ThemePreference::Light,
        }
    }

    /// Read the preference from `key`.
    pub fn load<S: SlotStore + ?Sized>(slots: &S, key: &str) -> Result<Self> {
        Ok(Self::from_stored(slots.get(key)?.as_deref()))
    }

    /// Write the preference to `key`.
    pub fn save<S: SlotStore + ?Sized>(self, slots: &S, key: &str) -> Result<()> {
        slots.set(key, self.as_str())
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = RevisaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            other => Err(RevisaError::config(format!(
                "unknown theme '{}' (expected light or dark)",
                other
            ))),
        }
    }
}
