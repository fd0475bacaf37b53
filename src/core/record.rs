//! Study records and their identifiers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RevisaError, Result};

/// Calendar date format used in persisted data and user input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One logged study session.
///
/// Field names on disk follow the established storage format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyRecord {
    /// Opaque unique token derived from the creation time.
    pub id: String,
    /// What was studied.
    #[serde(rename = "conteudo")]
    pub content: String,
    /// Day the study happened, `YYYY-MM-DD`.
    ///
    /// Kept as text so a damaged value survives a load/save cycle.
    #[serde(rename = "dataBase")]
    pub base_date: String,
    /// When the record was created.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl StudyRecord {
    /// Build a record stamped at `now`.
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        base_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            base_date: format_date(base_date),
            created_at: now,
        }
    }

    /// The base date, if it parses.
    pub fn parsed_base_date(&self) -> Option<NaiveDate> {
        parse_date(&self.base_date).ok()
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RevisaError::missing_field("date"));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| RevisaError::invalid_date(trimmed))
}

/// Format a calendar date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Encode a millisecond timestamp as a compact base-36 token.
pub fn encode_id(millis: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if millis == 0 {
        return "0".to_string();
    }

    let mut n = millis;
    let mut buf = Vec::new();
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}

/// Generate an id from `now`, skipping values for which `taken` returns true.
///
/// Ids are the base-36 creation time in milliseconds. Two records created in
/// the same millisecond get consecutive values.
pub fn generate_id(now: DateTime<Utc>, taken: impl Fn(&str) -> bool) -> String {
    let mut millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
    loop {
        let id = encode_id(millis);
        if !taken(&id) {
            return id;
        }
        millis += 1;
    }
}
