//! List command for Revisa.
//!
//! Shows every category (or one) with review checkpoints as of today.

use serde::{Deserialize, Serialize};

use crate::core::{Category, StateStore};
use crate::storage::SlotStore;
use crate::view::{BoardView, ListPresenter};

/// Options for the list command.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Only show this category.
    pub category: Option<Category>,
}

/// Output format for the list command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListOutput {
    /// Whether the list was successful.
    pub success: bool,
    /// Number of records shown.
    pub count: usize,
    /// The rendered board.
    pub board: BoardView,
}

/// The list command implementation.
pub struct ListCommand {
    presenter: ListPresenter,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(presenter: ListPresenter) -> Self {
        Self { presenter }
    }

    /// Run the list command.
    pub fn run<S: SlotStore>(&self, store: &StateStore<S>, options: &ListOptions) -> ListOutput {
        let mut board = self.presenter.render_all(store.state(), store.today());

        if let Some(category) = options.category {
            board.categories.retain(|c| c.category == category);
        }

        let count = board.categories.iter().map(|c| c.rows.len()).sum();
        ListOutput {
            success: true,
            count,
            board,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ListOutput, options: &ListOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.presenter.format_text(&output.board)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Clock;
    use crate::storage::MemorySlotStore;
    use chrono::NaiveDate;

    fn store_with_records() -> StateStore<MemorySlotStore> {
        let today = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        let (mut store, _) =
            StateStore::load_with_clock(MemorySlotStore::new(), "data", Clock::fixed_date(today))
                .unwrap();
        store
            .add_record(
                Category::Portugues,
                "Crase",
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            )
            .unwrap();
        store
            .add_record(
                Category::Direito,
                "Art. 5",
                NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            )
            .unwrap();
        store
    }

    #[test]
    fn test_list_all() {
        let store = store_with_records();
        let cmd = ListCommand::new(ListPresenter::default());

        let output = cmd.run(&store, &ListOptions::default());

        assert!(output.success);
        assert_eq!(output.count, 2);
        assert_eq!(output.board.categories.len(), 5);
        assert_eq!(output.board.today, "2024-01-20");
    }

    #[test]
    fn test_list_single_category() {
        let store = store_with_records();
        let cmd = ListCommand::new(ListPresenter::default());
        let options = ListOptions {
            category: Some(Category::Direito),
            ..Default::default()
        };

        let output = cmd.run(&store, &options);

        assert_eq!(output.count, 1);
        assert_eq!(output.board.categories.len(), 1);
        assert_eq!(output.board.categories[0].label, "Direito");
    }

    #[test]
    fn test_format_output_text() {
        let store = store_with_records();
        let cmd = ListCommand::new(ListPresenter::default());
        let options = ListOptions::default();

        let text = cmd.format_output(&cmd.run(&store, &options), &options);

        assert!(text.contains("Crase — (2024-01-01)"));
        assert!(text.contains("✔ 14 days → 15/01/2024"));
        assert!(text.contains("Inglês\n  No records"));
    }

    #[test]
    fn test_format_output_json() {
        let store = store_with_records();
        let cmd = ListCommand::new(ListPresenter::default());
        let options = ListOptions {
            json: true,
            ..Default::default()
        };

        let formatted = cmd.format_output(&cmd.run(&store, &options), &options);
        let parsed: serde_json::Value = serde_json::from_str(&formatted).unwrap();

        assert_eq!(parsed["success"], true);
        assert_eq!(parsed["count"], 2);
    }

    #[test]
    fn test_format_output_quiet() {
        let store = store_with_records();
        let cmd = ListCommand::new(ListPresenter::default());
        let options = ListOptions {
            quiet: true,
            ..Default::default()
        };

        assert!(cmd
            .format_output(&cmd.run(&store, &options), &options)
            .is_empty());
    }
}
