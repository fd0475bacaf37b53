//! Unified error types for Revisa.
//!
//! User input problems (missing fields, bad dates, unknown subjects) abort the
//! action that triggered them. Infrastructure problems (unreadable config,
//! failed writes) are non-fatal: callers log a warning and keep going with
//! what they have in memory.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Revisa operations.
#[derive(Error, Debug)]
pub enum RevisaError {
    /// A required input field was empty.
    #[error("missing required field: {field}")]
    MissingRequiredField { field: &'static str },

    /// A date was not a valid `YYYY-MM-DD` calendar date.
    #[error("invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// A subject name did not match any of the fixed categories.
    #[error("unknown category '{value}'")]
    UnknownCategory { value: String },

    /// Persisted state could not be decoded.
    #[error("corrupt persisted state: {message}")]
    CorruptState { message: String },

    /// Writing a slot failed (quota exceeded, disk full, permissions).
    #[error("failed to persist slot '{key}': {message}")]
    PersistenceWrite { key: String, message: String },

    /// I/O errors while reading slots or config files.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },
}

/// A specialized Result type for Revisa operations.
pub type Result<T> = std::result::Result<T, RevisaError>;

impl RevisaError {
    /// Create a missing field error.
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingRequiredField { field }
    }

    /// Create an invalid date error.
    pub fn invalid_date(value: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
        }
    }

    /// Create an unknown category error.
    pub fn unknown_category(value: impl Into<String>) -> Self {
        Self::UnknownCategory {
            value: value.into(),
        }
    }

    /// Create a corrupt state error.
    pub fn corrupt_state(message: impl Into<String>) -> Self {
        Self::CorruptState {
            message: message.into(),
        }
    }

    /// Create a persistence write error.
    pub fn persistence_write(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PersistenceWrite {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the error was caused by user input rather than infrastructure.
    ///
    /// Input errors block the action; everything else is reported as a
    /// warning and the in-memory state is kept.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredField { .. } | Self::InvalidDate { .. } | Self::UnknownCategory { .. }
        )
    }
}

impl From<io::Error> for RevisaError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for RevisaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Trait for fail-open error handling.
///
/// Logs the error as a warning and substitutes a safe value.
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (using default)", context, err);
                T::default()
            }
        }
    }
}

/// Exit codes for the Revisa CLI.
pub mod exit_codes {
    /// The command completed.
    pub const SUCCESS: i32 = 0;

    /// The command was rejected or could not run.
    pub const ERROR: i32 = 1;

    /// The process panicked.
    pub const CRASH: i32 = 3;
}
