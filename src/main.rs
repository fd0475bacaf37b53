//! Revisa - spaced-repetition study tracker
//!
//! CLI entry point with global panic handler.

use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use revisa::actions::{Action, AssumeYes, Confirm};
use revisa::cli::{
    ActionCommand, ActionOptions, ListCommand, ListOptions, PromptConfirm, ThemeChange,
    ThemeCommand,
};
use revisa::config::{revisa_home, Config};
use revisa::core::{format_date, Category, LoadOutcome, StateStore, ThemePreference};
use revisa::error::{exit_codes, RevisaError};
use revisa::storage::FileSlotStore;
use revisa::view::ListPresenter;

// =============================================================================
// CLI Definition
// =============================================================================

/// Revisa - log study sessions and see when to review them
#[derive(Parser)]
#[command(name = "revisa")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, short, global = true)]
    json: bool,

    /// Suppress output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Answer yes to confirmation prompts
    #[arg(long, short, global = true)]
    yes: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a study session
    Add {
        /// Subject (portugues, matematica, ingles, direito, literatura)
        category: String,
        /// What was studied
        content: String,
        /// Day of study, YYYY-MM-DD (defaults to today)
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Show records and their review dates
    List {
        /// Only show this subject
        #[arg(value_parser = parse_category)]
        category: Option<Category>,
    },

    /// Mark a record as studied today, restarting its schedule
    Review {
        /// Subject of the record
        #[arg(value_parser = parse_category)]
        category: Category,
        /// Record ID
        id: String,
    },

    /// Delete a record
    Delete {
        /// Subject of the record
        #[arg(value_parser = parse_category)]
        category: Category,
        /// Record ID
        id: String,
    },

    /// Delete all records
    Clear,

    /// Show or change the theme preference
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the stored theme
    Show,
    /// Switch between light and dark
    Toggle,
    /// Store a theme
    Set {
        /// light or dark
        #[arg(value_parser = parse_theme)]
        theme: ThemePreference,
    },
}

/// Map the theme subcommand to a change; a bare `theme` shows the preference.
fn theme_change(action: Option<ThemeAction>) -> ThemeChange {
    match action {
        None | Some(ThemeAction::Show) => ThemeChange::Show,
        Some(ThemeAction::Toggle) => ThemeChange::Toggle,
        Some(ThemeAction::Set { theme }) => ThemeChange::Set(theme),
    }
}

fn parse_category(value: &str) -> Result<Category, String> {
    value.parse().map_err(|e: RevisaError| e.to_string())
}

fn parse_theme(value: &str) -> Result<ThemePreference, String> {
    value.parse().map_err(|e: RevisaError| e.to_string())
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    setup_panic_handler();
    init_logging();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("revisa error: {}", e);
            ExitCode::from(exit_codes::ERROR as u8)
        }
    }
}

/// Route `tracing` output to stderr, filtered by `REVISA_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_env("REVISA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Set up the global panic handler.
///
/// On panic, logs to ~/.revisa/crash.log and exits with code 3.
fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("revisa panic: {}", info);

        if let Some(home) = revisa_home() {
            let crash_log = home.join("crash.log");
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log)
            {
                let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
                let _ = writeln!(file, "[{}] {}", timestamp, info);
            }
        }

        std::process::exit(exit_codes::CRASH);
    }));
}

/// Run the CLI and return the exit code.
fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let Cli {
        command,
        json,
        quiet,
        yes,
    } = Cli::parse();
    let config = Config::load();

    let slots_dir = config
        .slots_dir()
        .ok_or("could not determine slots directory (no home directory)")?;
    let slots = FileSlotStore::with_dir(slots_dir)?;
    let presenter = ListPresenter::from_config(&config.display);
    let flags = Flags { json, quiet, yes };

    match command {
        Commands::Theme { action } => run_theme(&slots, &config, theme_change(action), json),
        Commands::List { category } => {
            let store = open_store(slots, &config, quiet)?;
            run_list(&store, presenter, category, json, quiet)
        }
        Commands::Add {
            category,
            content,
            date,
        } => {
            let store = open_store(slots, &config, quiet)?;
            let date = date.unwrap_or_else(|| format_date(store.today()));
            let action = Action::Add {
                category,
                content,
                date,
            };
            run_action(store, presenter, action, flags)
        }
        Commands::Review { category, id } => {
            let store = open_store(slots, &config, quiet)?;
            run_action(store, presenter, Action::MarkReviewedToday { category, id }, flags)
        }
        Commands::Delete { category, id } => {
            let store = open_store(slots, &config, quiet)?;
            run_action(store, presenter, Action::Delete { category, id }, flags)
        }
        Commands::Clear => {
            let store = open_store(slots, &config, quiet)?;
            run_action(store, presenter, Action::ClearAll, flags)
        }
    }
}

/// Global output and prompt flags.
#[derive(Debug, Clone, Copy)]
struct Flags {
    json: bool,
    quiet: bool,
    yes: bool,
}

/// Load the study records, warning on stderr when stored data was unreadable.
fn open_store(
    slots: FileSlotStore,
    config: &Config,
    quiet: bool,
) -> Result<StateStore<FileSlotStore>, Box<dyn std::error::Error>> {
    let (store, outcome) = StateStore::load(slots, config.storage.data_key.clone())?;
    if outcome.is_degraded() && !quiet {
        report_degraded_load(&outcome);
    }
    Ok(store)
}

fn run_action(
    mut store: StateStore<FileSlotStore>,
    presenter: ListPresenter,
    action: Action,
    flags: Flags,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut confirm: Box<dyn Confirm> = if flags.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(PromptConfirm)
    };

    let cmd = ActionCommand::new(presenter);
    let output = cmd.run(&mut store, action, confirm.as_mut());
    let options = ActionOptions {
        json: flags.json,
        quiet: flags.quiet,
    };

    let formatted = cmd.format_output(&output, &options);
    if !formatted.is_empty() {
        if output.success {
            println!("{}", formatted);
        } else {
            eprintln!("{}", formatted);
        }
    }

    Ok(success_to_exit_code(output.success))
}

fn report_degraded_load(outcome: &LoadOutcome) {
    match outcome {
        LoadOutcome::Corrupt { reason } => {
            let err = RevisaError::corrupt_state(reason.as_str());
            eprintln!("Warning: {err}; starting with no records");
        }
        LoadOutcome::Restored(report) => {
            eprintln!(
                "Warning: {} record(s) and {} subject(s) could not be read; they are kept in storage untouched",
                report.unreadable_records,
                report.unreadable_categories.len()
            );
        }
        LoadOutcome::Missing => {}
    }
}

fn run_list(
    store: &StateStore<FileSlotStore>,
    presenter: ListPresenter,
    category: Option<Category>,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cmd = ListCommand::new(presenter);
    let options = ListOptions {
        json,
        quiet,
        category,
    };

    let output = cmd.run(store, &options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_theme(
    slots: &FileSlotStore,
    config: &Config,
    change: ThemeChange,
    json: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cmd = ThemeCommand::new(slots, config.storage.theme_key.clone());
    let output = cmd.run(change);
    println!("{}", cmd.format_output(&output, json));
    Ok(success_to_exit_code(output.success))
}

fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::from(exit_codes::SUCCESS as u8)
    } else {
        ExitCode::from(exit_codes::ERROR as u8)
    }
}
