//! Core types and logic for Revisa.
//!
//! Categories, study records, the review schedule, and the state store that
//! keeps the aggregate in sync with its slot.

pub mod category;
pub mod clock;
pub mod record;
pub mod schedule;
pub mod state;
pub mod store;
pub mod theme;

pub use category::Category;
pub use clock::Clock;
pub use record::{format_date, generate_id, parse_date, StudyRecord};
pub use schedule::{checkpoints_for, compute_checkpoints, ReviewCheckpoint, REVIEW_INTERVALS};
pub use state::{LoadOutcome, RestoreReport, StudyState};
pub use store::StateStore;
pub use theme::ThemePreference;
