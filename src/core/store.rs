//! The state store: the aggregate plus the slot it lives in.
//!
//! Every mutation is applied in memory first and then persisted. If the
//! write fails the in-memory change is kept and the error is returned, so
//! the caller can warn the user without losing what they just entered.

use chrono::NaiveDate;

use crate::core::category::Category;
use crate::core::clock::Clock;
use crate::core::record::{format_date, generate_id, StudyRecord};
use crate::core::state::{LoadOutcome, StudyState};
use crate::error::{RevisaError, Result};
use crate::storage::SlotStore;

/// Owns the study aggregate and persists it to a single slot.
#[derive(Debug)]
pub struct StateStore<S: SlotStore> {
    slots: S,
    key: String,
    state: StudyState,
    clock: Clock,
}

impl<S: SlotStore> StateStore<S> {
    /// Load the aggregate stored under `key`, using the system clock.
    pub fn load(slots: S, key: impl Into<String>) -> Result<(Self, LoadOutcome)> {
        Self::load_with_clock(slots, key, Clock::System)
    }

    /// Load the aggregate stored under `key`.
    ///
    /// Only a failure to read the slot is an error. Text that is not a JSON
    /// object is replaced by an empty aggregate; entries that are not valid
    /// records are kept for the next save. Both are reported through the
    /// outcome.
    pub fn load_with_clock(
        slots: S,
        key: impl Into<String>,
        clock: Clock,
    ) -> Result<(Self, LoadOutcome)> {
        let key = key.into();
        let raw = slots.get(&key)?;
        let (state, outcome) = StudyState::decode(raw.as_deref());

        match &outcome {
            LoadOutcome::Missing => tracing::debug!("slot '{}' is empty, starting fresh", key),
            LoadOutcome::Restored(report) => tracing::debug!(
                "loaded {} record(s) from '{}' ({} unreadable, kept as-is)",
                state.len(),
                key,
                report.unreadable_records
            ),
            LoadOutcome::Corrupt { reason } => {
                tracing::warn!("discarding unreadable data in '{}': {}", key, reason)
            }
        }

        let store = Self {
            slots,
            key,
            state,
            clock,
        };
        Ok((store, outcome))
    }

    /// The current aggregate.
    pub fn state(&self) -> &StudyState {
        &self.state
    }

    /// Today's date according to the store clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Write the whole aggregate to the slot, overwriting it.
    pub fn save(&self) -> Result<()> {
        let encoded = self
            .state
            .encode()
            .map_err(|e| RevisaError::persistence_write(&self.key, e.to_string()))?;
        self.slots.set(&self.key, &encoded)
    }

    /// Log a study session.
    ///
    /// `content` is trimmed and must not be empty. Identical content may be
    /// logged any number of times.
    pub fn add_record(
        &mut self,
        category: Category,
        content: &str,
        base_date: NaiveDate,
    ) -> Result<StudyRecord> {
        let content = content.trim();
        if content.is_empty() {
            return Err(RevisaError::missing_field("content"));
        }

        let now = self.clock.now();
        let id = generate_id(now, |candidate| self.state.contains_id(candidate));
        let record = StudyRecord::new(id, content, base_date, now);

        self.state.push(category, record.clone());
        tracing::debug!("added record {} to {}", record.id, category);
        self.save()?;
        Ok(record)
    }

    /// Delete a record. Returns whether one was removed.
    ///
    /// An unknown id is not an error and leaves storage untouched.
    pub fn delete_record(&mut self, category: Category, id: &str) -> Result<bool> {
        if self.state.remove(category, id).is_none() {
            tracing::debug!("no record {} in {}, nothing to delete", id, category);
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Replace a record's base date. Returns whether the record was found.
    pub fn update_base_date(
        &mut self,
        category: Category,
        id: &str,
        new_date: NaiveDate,
    ) -> Result<bool> {
        let Some(record) = self.state.find_mut(category, id) else {
            return Ok(false);
        };
        record.base_date = format_date(new_date);
        self.save()?;
        Ok(true)
    }

    /// Set a record's base date to today, restarting its review schedule.
    pub fn mark_reviewed_today(&mut self, category: Category, id: &str) -> Result<bool> {
        let today = self.today();
        self.update_base_date(category, id, today)
    }

    /// Drop every record, including unreadable entries and unknown keys.
    pub fn clear_all(&mut self) -> Result<()> {
        self.state = StudyState::empty();
        self.save()
    }
}
