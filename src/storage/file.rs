//! File-based slot storage for Revisa.
//!
//! Each slot is a file named after its key inside `~/.revisa/slots/`.
//! Atomic writes are achieved via temp file + rename pattern.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::error::{RevisaError, Result};
use crate::storage::traits::is_valid_slot_key;
use crate::storage::SlotStore;

/// File-based slot storage.
///
/// Stores each slot as a plain text file in a configurable directory.
/// Uses atomic writes via temp file + rename pattern.
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    /// Directory where slot files are stored.
    dir: PathBuf,
}

impl FileSlotStore {
    /// Create a new file slot store with a custom directory.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();

        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| RevisaError::storage(&dir, e))?;
        }

        Ok(Self { dir })
    }

    /// Get the path for a slot file.
    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Get the path for a temp file used during atomic writes.
    fn temp_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{}.tmp", key))
    }

    /// Write a slot atomically using temp file + rename.
    fn atomic_write(&self, key: &str, value: &str) -> io::Result<()> {
        let final_path = self.slot_path(key);
        let temp_path = self.temp_path(key);

        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }

        // Rename temp file to final path (atomic on POSIX)
        fs::rename(&temp_path, &final_path)
    }
}

/// Reject keys that would escape the slot directory or collide with temp files.
fn validate_key(key: &str) -> io::Result<()> {
    if is_valid_slot_key(key) {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid slot key '{}'", key),
        ))
    }
}

impl SlotStore for FileSlotStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key).map_err(|e| RevisaError::storage(&self.dir, e))?;
        let path = self.slot_path(key);

        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RevisaError::storage(&path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)
            .and_then(|()| self.atomic_write(key, value))
            .map_err(|e| {
                // Leave no stray temp file behind after a failed write
                let _ = fs::remove_file(self.temp_path(key));
                RevisaError::persistence_write(key, e.to_string())
            })
    }
}
