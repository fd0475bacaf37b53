//! Slot storage traits for Revisa.
//!
//! This module defines the `SlotStore` trait for key-value text persistence.

use std::sync::Arc;

use crate::error::Result;

/// Whether `key` is usable as a slot name.
///
/// Keys are restricted to ASCII alphanumerics, `_`, `-` and `.`, and must not
/// start with a dot, so a key can always be used as a plain file name.
pub fn is_valid_slot_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Trait for slot storage backends.
///
/// Implementations store opaque text values under string keys. Writes
/// overwrite unconditionally; there is no versioning or merge.
pub trait SlotStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the slot has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// Failures are reported as `RevisaError::PersistenceWrite`.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Blanket implementation of SlotStore for Arc-wrapped stores.
///
/// Lets a test keep a handle on the backing store while a `StateStore`
/// owns another, which is how a page reload is simulated.
impl<T: SlotStore + ?Sized> SlotStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Test utilities for SlotStore implementations.
#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_is_valid_slot_key() {
        assert!(is_valid_slot_key("revisoesPMMG_v3"));
        assert!(is_valid_slot_key("temaPMMG"));
        assert!(is_valid_slot_key("backup-2024.01"));
        assert!(!is_valid_slot_key(""));
        assert!(!is_valid_slot_key(".hidden"));
        assert!(!is_valid_slot_key("../up"));
        assert!(!is_valid_slot_key("with space"));
    }

    /// Test helper to verify SlotStore implementations.
    pub fn test_slot_store_crud<S: SlotStore>(store: &S) {
        let key = "revisoesPMMG_v3";

        // Initially absent
        assert!(store.get(key).unwrap().is_none());

        store.set(key, r#"{"portugues":[]}"#).unwrap();
        assert_eq!(
            store.get(key).unwrap().as_deref(),
            Some(r#"{"portugues":[]}"#)
        );

        // Overwrite
        store.set(key, "light").unwrap();
        assert_eq!(store.get(key).unwrap().as_deref(), Some("light"));

        // Other keys are independent
        store.set("temaPMMG", "dark").unwrap();
        assert_eq!(store.get(key).unwrap().as_deref(), Some("light"));
        assert_eq!(store.get("temaPMMG").unwrap().as_deref(), Some("dark"));
    }
}
