//! In-memory slot storage.
//!
//! Used by tests, and by callers that want a throwaway store. An optional
//! byte quota mimics the capacity limit of browser local storage so write
//! failures can be exercised.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{RevisaError, Result};
use crate::storage::SlotStore;

/// In-memory slot store.
///
/// Thread-safe implementation using `RwLock<HashMap>`.
/// Slots are lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: RwLock<HashMap<String, String>>,
    /// Maximum total bytes across keys and values, if limited.
    quota: Option<usize>,
}

impl MemorySlotStore {
    /// Create a new empty in-memory store without a quota.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects writes pushing its size past `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.read().unwrap().is_empty()
    }

    /// Total bytes used by keys and values.
    pub fn used_bytes(&self) -> usize {
        let slots = self.slots.read().unwrap();
        slots.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl SlotStore for MemorySlotStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let slots = self.slots.read().unwrap();
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self.slots.write().unwrap();

        if let Some(quota) = self.quota {
            let others: usize = slots
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(RevisaError::persistence_write(
                    key,
                    format!("quota exceeded ({} bytes, max {} bytes)", needed, quota),
                ));
            }
        }

        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
