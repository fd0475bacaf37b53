//! User actions.
//!
//! Each action runs against a [`StateStore`] and tells the caller whether to
//! redraw and what, if anything, to tell the user. Destructive actions ask a
//! [`Confirm`] implementation first.

use serde::{Deserialize, Serialize};

use crate::core::{parse_date, Category, StateStore};
use crate::error::RevisaError;
use crate::storage::SlotStore;

/// Asks the user a yes/no question.
pub trait Confirm {
    /// Return true to proceed.
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Answers yes to everything (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Something the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Log a study session. Fields are raw user input, validated on dispatch.
    Add {
        category: String,
        content: String,
        date: String,
    },
    /// Remove one record.
    Delete { category: Category, id: String },
    /// Restart a record's schedule from today.
    MarkReviewedToday { category: Category, id: String },
    /// Remove every record.
    ClearAll,
}

impl Action {
    /// Question to ask before running, if the action needs confirmation.
    pub fn confirmation_prompt(&self) -> Option<&'static str> {
        match self {
            Action::Add { .. } => None,
            Action::Delete { .. } => Some("Delete this record?"),
            Action::MarkReviewedToday { .. } => Some("Mark this subject as studied today?"),
            Action::ClearAll => Some("Delete all records?"),
        }
    }
}

/// Whether the view must be rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Render {
    /// Rebuild every category.
    Full,
    /// Nothing changed.
    Skip,
}

/// How prominently to show a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// The action was refused; the user must fix their input.
    Blocking,
    /// The action ran but something went wrong afterwards.
    Warning,
    /// Informational.
    Info,
}

/// Message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn blocking(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Blocking,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

/// What happened when an action ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub render: Render,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl ActionOutcome {
    fn rendered() -> Self {
        Self {
            render: Render::Full,
            notice: None,
        }
    }

    fn unchanged() -> Self {
        Self {
            render: Render::Skip,
            notice: None,
        }
    }

    fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }

    /// Whether the action was refused because of user input.
    pub fn is_blocked(&self) -> bool {
        self.notice
            .as_ref()
            .is_some_and(|n| n.level == NoticeLevel::Blocking)
    }

    /// Map a store error to an outcome.
    ///
    /// Input errors block without changes. Anything else happened after the
    /// in-memory state changed, so the view is still rebuilt.
    fn from_error(err: RevisaError) -> Self {
        if err.is_user_input() {
            Self::unchanged().with_notice(Notice::blocking(err.to_string()))
        } else {
            tracing::warn!("action failed after mutation: {}", err);
            Self::rendered().with_notice(Notice::warning(format!(
                "Changes were not saved: {}",
                err
            )))
        }
    }
}

/// Run `action` against `store`.
pub fn dispatch<S, C>(store: &mut StateStore<S>, action: Action, confirm: &mut C) -> ActionOutcome
where
    S: SlotStore,
    C: Confirm + ?Sized,
{
    if let Some(prompt) = action.confirmation_prompt() {
        if !confirm.confirm(prompt) {
            tracing::debug!("action declined: {:?}", action);
            return ActionOutcome::unchanged();
        }
    }

    let result = match action {
        Action::Add {
            category,
            content,
            date,
        } => add(store, &category, &content, &date),
        Action::Delete { category, id } => store
            .delete_record(category, &id)
            .map(|found| not_found_notice(found, category, &id)),
        Action::MarkReviewedToday { category, id } => store
            .mark_reviewed_today(category, &id)
            .map(|found| not_found_notice(found, category, &id)),
        Action::ClearAll => store.clear_all().map(|()| None),
    };

    match result {
        Ok(Some(notice)) => ActionOutcome::rendered().with_notice(notice),
        Ok(None) => ActionOutcome::rendered(),
        Err(err) => ActionOutcome::from_error(err),
    }
}

fn add<S: SlotStore>(
    store: &mut StateStore<S>,
    category: &str,
    content: &str,
    date: &str,
) -> Result<Option<Notice>, RevisaError> {
    // Presence is checked for every field before any parsing
    for (field, value) in [("category", category), ("content", content), ("date", date)] {
        if value.trim().is_empty() {
            return Err(RevisaError::missing_field(field));
        }
    }

    let category: Category = category.parse()?;
    let base_date = parse_date(date)?;
    store.add_record(category, content, base_date)?;
    Ok(None)
}

fn not_found_notice(found: bool, category: Category, id: &str) -> Option<Notice> {
    (!found).then(|| Notice::info(format!("No record '{}' in {}", id, category.label())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Clock, StudyState};
    use crate::storage::MemorySlotStore;
    use crate::view::ListPresenter;
    use chrono::NaiveDate;
    use std::sync::Arc;

    const KEY: &str = "revisoesPMMG_v3";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn open(slots: Arc<MemorySlotStore>, today: NaiveDate) -> StateStore<Arc<MemorySlotStore>> {
        StateStore::load_with_clock(slots, KEY, Clock::fixed_date(today))
            .unwrap()
            .0
    }

    fn add_action(category: &str, content: &str, date: &str) -> Action {
        Action::Add {
            category: category.to_string(),
            content: content.to_string(),
            date: date.to_string(),
        }
    }

    #[test]
    fn test_add_renders() {
        let mut store = open(Arc::new(MemorySlotStore::new()), date(2024, 1, 1));

        let outcome = dispatch(
            &mut store,
            add_action("Matemática", "Razão e proporção", "2024-01-01"),
            &mut AssumeYes,
        );

        assert_eq!(outcome, ActionOutcome::rendered());
        assert_eq!(store.state().records(Category::Matematica).len(), 1);
    }

    #[test]
    fn test_add_missing_fields_in_order() {
        let mut store = open(Arc::new(MemorySlotStore::new()), date(2024, 1, 1));

        let cases = [
            (add_action("", "", ""), "category"),
            (add_action("ingles", " ", ""), "content"),
            (add_action("ingles", "Reading", ""), "date"),
        ];

        for (action, field) in cases {
            let outcome = dispatch(&mut store, action, &mut AssumeYes);
            assert!(outcome.is_blocked());
            assert_eq!(outcome.render, Render::Skip);
            let message = outcome.notice.unwrap().message;
            assert_eq!(message, format!("missing required field: {}", field));
        }

        assert!(store.state().is_empty());
    }

    #[test]
    fn test_add_rejects_bad_category_and_date() {
        let mut store = open(Arc::new(MemorySlotStore::new()), date(2024, 1, 1));

        let outcome = dispatch(
            &mut store,
            add_action("historia", "Era Vargas", "2024-01-01"),
            &mut AssumeYes,
        );
        assert!(outcome.is_blocked());

        let outcome = dispatch(
            &mut store,
            add_action("direito", "Art. 5", "2024-02-30"),
            &mut AssumeYes,
        );
        assert!(outcome.is_blocked());
        assert!(outcome.notice.unwrap().message.contains("2024-02-30"));

        assert!(store.state().is_empty());
    }

    #[test]
    fn test_declined_confirmation_does_nothing() {
        let slots = Arc::new(MemorySlotStore::new());
        let mut store = open(Arc::clone(&slots), date(2024, 1, 1));
        dispatch(
            &mut store,
            add_action("portugues", "Crase", "2024-01-01"),
            &mut AssumeYes,
        );
        let id = store.state().records(Category::Portugues)[0].id.clone();
        let before = store.state().clone();

        let mut asked = Vec::new();
        let mut decline = |prompt: &str| {
            asked.push(prompt.to_string());
            false
        };

        for action in [
            Action::Delete {
                category: Category::Portugues,
                id: id.clone(),
            },
            Action::MarkReviewedToday {
                category: Category::Portugues,
                id: id.clone(),
            },
            Action::ClearAll,
        ] {
            let outcome = dispatch(&mut store, action, &mut decline);
            assert_eq!(outcome, ActionOutcome::unchanged());
        }

        assert_eq!(store.state(), &before);
        assert_eq!(asked.len(), 3);
        assert_eq!(asked[2], "Delete all records?");
    }

    #[test]
    fn test_add_is_never_confirmed() {
        let mut store = open(Arc::new(MemorySlotStore::new()), date(2024, 1, 1));
        let mut refuse_all = |_: &str| false;

        let outcome = dispatch(
            &mut store,
            add_action("literatura", "Romantismo", "2024-01-01"),
            &mut refuse_all,
        );

        assert_eq!(outcome.render, Render::Full);
        assert_eq!(store.state().len(), 1);
    }

    #[test]
    fn test_mark_reviewed_today_moves_schedule() {
        let slots = Arc::new(MemorySlotStore::new());
        let mut store = open(Arc::clone(&slots), date(2024, 2, 1));
        dispatch(
            &mut store,
            add_action("ingles", "Passive voice", "2024-01-01"),
            &mut AssumeYes,
        );
        let id = store.state().records(Category::Ingles)[0].id.clone();

        let outcome = dispatch(
            &mut store,
            Action::MarkReviewedToday {
                category: Category::Ingles,
                id,
            },
            &mut AssumeYes,
        );
        assert_eq!(outcome.render, Render::Full);

        // Reload and render: the schedule now starts at 2024-02-01
        let reloaded = open(slots, date(2024, 2, 1));
        let view = ListPresenter::default().render_category(
            reloaded.state(),
            Category::Ingles,
            reloaded.today(),
        );
        assert_eq!(view.rows[0].checkpoints[0].date.as_deref(), Some("2024-02-08"));
        assert!(view.rows[0].checkpoints.iter().all(|c| !c.reached));
    }

    #[test]
    fn test_delete_unknown_id_is_informational() {
        let mut store = open(Arc::new(MemorySlotStore::new()), date(2024, 1, 1));

        let outcome = dispatch(
            &mut store,
            Action::Delete {
                category: Category::Direito,
                id: "ghost".to_string(),
            },
            &mut AssumeYes,
        );

        assert!(!outcome.is_blocked());
        assert_eq!(outcome.notice.unwrap().level, NoticeLevel::Info);
        assert!(store.state().is_empty());
    }

    #[test]
    fn test_clear_all_then_render_all_shows_placeholders() {
        let mut store = open(Arc::new(MemorySlotStore::new()), date(2024, 1, 1));
        for category in ["portugues", "direito", "ingles"] {
            dispatch(
                &mut store,
                add_action(category, "Revisão geral", "2024-01-01"),
                &mut AssumeYes,
            );
        }

        let outcome = dispatch(&mut store, Action::ClearAll, &mut AssumeYes);
        assert_eq!(outcome.render, Render::Full);
        assert_eq!(store.state(), &StudyState::empty());

        let board = ListPresenter::default().render_all(store.state(), store.today());
        assert!(board.categories.iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_persist_failure_is_a_warning() {
        let slots = Arc::new(MemorySlotStore::with_quota(150));
        let mut store = open(Arc::clone(&slots), date(2024, 1, 1));

        let outcome = dispatch(
            &mut store,
            add_action("portugues", &"Interpretação de texto ".repeat(10), "2024-01-01"),
            &mut AssumeYes,
        );

        assert_eq!(outcome.render, Render::Full);
        let notice = outcome.notice.unwrap();
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert!(notice.message.contains("quota exceeded"));
        // Kept in memory for this session
        assert_eq!(store.state().records(Category::Portugues).len(), 1);
    }
}
