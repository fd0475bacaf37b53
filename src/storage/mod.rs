//! Slot storage for Revisa.
//!
//! A slot is a named text value, the same model as a browser's local
//! storage. File-based and in-memory backends are provided.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileSlotStore;
pub use memory::MemorySlotStore;
pub use traits::SlotStore;
