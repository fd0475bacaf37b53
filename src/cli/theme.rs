//! Theme command for Revisa.
//!
//! Reads or changes the stored theme preference.

use serde::{Deserialize, Serialize};

use crate::core::ThemePreference;
use crate::error::FailOpen;
use crate::storage::SlotStore;

/// What to do with the preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeChange {
    /// Only report the current value.
    Show,
    /// Switch between light and dark.
    Toggle,
    /// Store a specific value.
    Set(ThemePreference),
}

/// Output format for the theme command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeOutput {
    pub success: bool,
    pub theme: ThemePreference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The theme command implementation.
pub struct ThemeCommand<'a, S: SlotStore + ?Sized> {
    slots: &'a S,
    key: String,
}

impl<'a, S: SlotStore + ?Sized> ThemeCommand<'a, S> {
    /// Create a new theme command over the slot `key`.
    pub fn new(slots: &'a S, key: impl Into<String>) -> Self {
        Self {
            slots,
            key: key.into(),
        }
    }

    /// Run the theme command.
    pub fn run(&self, change: ThemeChange) -> ThemeOutput {
        let current = ThemePreference::load(self.slots, &self.key)
            .fail_open_default("reading theme preference");

        let target = match change {
            ThemeChange::Show => {
                return ThemeOutput {
                    success: true,
                    theme: current,
                    error: None,
                }
            }
            ThemeChange::Toggle => current.toggled(),
            ThemeChange::Set(theme) => theme,
        };

        match target.save(self.slots, &self.key) {
            Ok(()) => ThemeOutput {
                success: true,
                theme: target,
                error: None,
            },
            Err(e) => ThemeOutput {
                success: false,
                theme: current,
                error: Some(e.to_string()),
            },
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ThemeOutput, json: bool) -> String {
        if json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }
        match &output.error {
            Some(error) => format!("Theme unchanged ({}): {}", output.theme, error),
            None => format!("Theme: {}", output.theme),
        }
    }
}
