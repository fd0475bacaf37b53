//! Revisa - spaced-repetition study tracker.
//!
//! Revisa logs study sessions per subject and schedules reviews 7, 14, 20
//! and 30 days after each session. Records live in a key-value slot store
//! (a directory of files by default) and every change is written back
//! immediately.
//!
//! Two processes sharing the same slot overwrite each other's writes; the
//! last save wins.

pub mod actions;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod storage;
pub mod view;

pub use actions::{dispatch, Action, ActionOutcome, AssumeYes, Confirm, Notice, NoticeLevel, Render};
pub use config::Config;
pub use core::{
    checkpoints_for, compute_checkpoints, Category, Clock, LoadOutcome, RestoreReport,
    ReviewCheckpoint, StateStore, StudyRecord, StudyState, ThemePreference, REVIEW_INTERVALS,
};
pub use error::{RevisaError, Result};
pub use storage::{FileSlotStore, MemorySlotStore, SlotStore};
pub use view::{BoardView, CategoryView, ListPresenter};

// CLI commands
pub use cli::{ActionCommand, ListCommand, ThemeCommand};
