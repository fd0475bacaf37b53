//! Mutating commands for Revisa: add, review, delete, clear.
//!
//! Each one dispatches a single action and, when the state changed,
//! re-renders the affected list so the user sees the result.

use serde::{Deserialize, Serialize};

use crate::actions::{dispatch, Action, Confirm, Notice, NoticeLevel, Render};
use crate::core::{Category, StateStore};
use crate::storage::SlotStore;
use crate::view::{BoardView, ListPresenter};

/// Options for action commands.
#[derive(Debug, Clone, Default)]
pub struct ActionOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for action commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionOutput {
    /// False when the action was refused.
    pub success: bool,
    /// False when the user declined the confirmation prompt.
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
    /// The re-rendered view, when the state changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<BoardView>,
}

/// Runs one action and renders the result.
pub struct ActionCommand {
    presenter: ListPresenter,
}

impl ActionCommand {
    /// Create a new action command.
    pub fn new(presenter: ListPresenter) -> Self {
        Self { presenter }
    }

    /// Dispatch `action` and build the output.
    pub fn run<S, C>(&self, store: &mut StateStore<S>, action: Action, confirm: &mut C) -> ActionOutput
    where
        S: SlotStore,
        C: Confirm + ?Sized,
    {
        // Show only the touched category after a single-record change
        let focus = focus_category(&action);
        let outcome = dispatch(store, action, confirm);

        let board = (outcome.render == Render::Full).then(|| {
            let mut board = self.presenter.render_all(store.state(), store.today());
            if let Some(category) = focus {
                board.categories.retain(|c| c.category == category);
            }
            board
        });

        ActionOutput {
            success: !outcome.is_blocked(),
            applied: outcome.render == Render::Full,
            notice: outcome.notice,
            board,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ActionOutput, options: &ActionOptions) -> String {
        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        let mut sections = Vec::new();

        if let Some(notice) = &output.notice {
            let prefix = match notice.level {
                NoticeLevel::Blocking => "Error",
                NoticeLevel::Warning => "Warning",
                NoticeLevel::Info => "Note",
            };
            sections.push(format!("{}: {}", prefix, notice.message));
        }

        if options.quiet {
            return sections.join("\n");
        }

        if !output.applied && output.success {
            sections.push("Cancelled.".to_string());
        }

        if let Some(board) = &output.board {
            sections.push(self.presenter.format_text(board));
        }

        sections.join("\n\n")
    }
}

fn focus_category(action: &Action) -> Option<Category> {
    match action {
        Action::Add { category, .. } => category.parse().ok(),
        Action::Delete { category, .. } | Action::MarkReviewedToday { category, .. } => {
            Some(*category)
        }
        Action::ClearAll => None,
    }
}
