//! CLI commands for Revisa.
//!
//! - **list**: show records and their review checkpoints
//! - **add / review / delete / clear**: change records (see [`action`])
//! - **theme**: read or change the stored theme preference

pub mod action;
pub mod list;
pub mod theme;

use std::io::{self, BufRead, Write};

use crate::actions::Confirm;

pub use action::{ActionCommand, ActionOptions, ActionOutput};
pub use list::{ListCommand, ListOptions, ListOutput};
pub use theme::{ThemeChange, ThemeCommand, ThemeOutput};

/// Asks on stderr and reads the answer from stdin.
///
/// Anything other than `y` or `yes` (case-insensitive) declines, including
/// end of input.
#[derive(Debug, Default)]
pub struct PromptConfirm;

impl Confirm for PromptConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        let mut stderr = io::stderr();
        let _ = write!(stderr, "{} [y/N] ", prompt);
        let _ = stderr.flush();

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                tracing::warn!("could not read confirmation: {}", e);
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
