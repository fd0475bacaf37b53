//! List presenter.
//!
//! Turns the aggregate into per-category lists of records with their review
//! checkpoints. Every call rebuilds the whole view from scratch; nothing is
//! cached, because "reached" depends on the day the view is built.

use std::cmp::Reverse;
use std::fmt::Write;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::{DisplayConfig, DEFAULT_DATE_FORMAT};
use crate::core::{checkpoints_for, format_date, Category, ReviewCheckpoint, StudyRecord, StudyState};

/// Placeholder shown for a category without records.
pub const NO_RECORDS: &str = "No records";

/// Label shown for a checkpoint whose date cannot be computed.
pub const UNKNOWN_DATE: &str = "unknown date";

/// Marker for a reached checkpoint.
const REACHED_MARK: &str = "✔";

/// Actions offered on every record row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAction {
    /// Restart the schedule from today.
    MarkReviewedToday,
    /// Remove the record.
    Delete,
}

/// One checkpoint line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointView {
    pub offset_days: u32,
    /// ISO date, absent when unknown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Localized date label.
    pub label: String,
    pub reached: bool,
}

/// One record with its schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRow {
    pub id: String,
    pub content: String,
    pub base_date: String,
    /// `"<content> — (<base date>)"`.
    pub title: String,
    pub checkpoints: Vec<CheckpointView>,
    pub actions: Vec<RowAction>,
}

/// All rows of one category, most recent study first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryView {
    pub category: Category,
    pub label: String,
    pub rows: Vec<RecordRow>,
}

impl CategoryView {
    /// Whether the placeholder should be shown instead of rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Every category, in fixed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    /// Day the view was computed for.
    pub today: String,
    pub categories: Vec<CategoryView>,
}

/// Builds views from the aggregate.
#[derive(Debug, Clone)]
pub struct ListPresenter {
    date_format: String,
}

impl Default for ListPresenter {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl ListPresenter {
    /// Create a presenter labelling dates with a strftime `date_format`.
    ///
    /// An invalid format falls back to the default, since formatting with it
    /// would fail at render time.
    pub fn new(date_format: impl Into<String>) -> Self {
        let date_format = date_format.into();
        if DisplayConfig::is_valid_date_format(&date_format) {
            Self { date_format }
        } else {
            tracing::warn!(
                "invalid date format '{}', using '{}'",
                date_format,
                DEFAULT_DATE_FORMAT
            );
            Self::default()
        }
    }

    /// Create a presenter from display settings.
    pub fn from_config(config: &DisplayConfig) -> Self {
        Self::new(config.date_format.clone())
    }

    /// Render one category as seen on `today`.
    pub fn render_category(
        &self,
        state: &StudyState,
        category: Category,
        today: NaiveDate,
    ) -> CategoryView {
        let mut records: Vec<&StudyRecord> = state.records(category).iter().collect();
        // Stable: equal dates keep insertion order. Unparseable dates go last.
        records.sort_by_key(|r| Reverse(r.parsed_base_date()));

        CategoryView {
            category,
            label: category.label().to_string(),
            rows: records.into_iter().map(|r| self.render_row(r, today)).collect(),
        }
    }

    /// Render every category as seen on `today`.
    pub fn render_all(&self, state: &StudyState, today: NaiveDate) -> BoardView {
        BoardView {
            today: format_date(today),
            categories: Category::ALL
                .into_iter()
                .map(|c| self.render_category(state, c, today))
                .collect(),
        }
    }

    fn render_row(&self, record: &StudyRecord, today: NaiveDate) -> RecordRow {
        RecordRow {
            id: record.id.clone(),
            content: record.content.clone(),
            base_date: record.base_date.clone(),
            title: format!("{} — ({})", record.content, record.base_date),
            checkpoints: checkpoints_for(&record.base_date, today)
                .iter()
                .map(|c| self.render_checkpoint(c))
                .collect(),
            actions: vec![RowAction::MarkReviewedToday, RowAction::Delete],
        }
    }

    fn render_checkpoint(&self, checkpoint: &ReviewCheckpoint) -> CheckpointView {
        CheckpointView {
            offset_days: checkpoint.offset_days,
            date: checkpoint.date.map(format_date),
            label: checkpoint
                .date
                .and_then(|d| {
                    format_label(d, &self.date_format)
                        .or_else(|| format_label(d, DEFAULT_DATE_FORMAT))
                })
                .unwrap_or_else(|| UNKNOWN_DATE.to_string()),
            reached: checkpoint.reached,
        }
    }

    /// Format one category as plain text.
    pub fn format_category_text(&self, view: &CategoryView) -> String {
        let mut lines = vec![view.label.clone()];

        if view.is_empty() {
            lines.push(format!("  {}", NO_RECORDS));
            return lines.join("\n");
        }

        for row in &view.rows {
            lines.push(format!("  {}  [{}]", row.title, row.id));
            for checkpoint in &row.checkpoints {
                let mark = if checkpoint.reached { REACHED_MARK } else { " " };
                lines.push(format!(
                    "    {} {} days → {}",
                    mark, checkpoint.offset_days, checkpoint.label
                ));
            }
        }

        lines.join("\n")
    }

    /// Format the whole board as plain text, one block per category.
    pub fn format_text(&self, board: &BoardView) -> String {
        board
            .categories
            .iter()
            .map(|c| self.format_category_text(c))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Format `date`, or `None` if the format asks for fields a date lacks.
fn format_label(date: NaiveDate, format: &str) -> Option<String> {
    let mut label = String::new();
    write!(label, "{}", date.format(format)).ok()?;
    Some(label)
}
