//! Interactive menu session.
//!
//! # Responsibility
//! - Drive the calendar through inquire prompts until the user exits.
//! - Track unsaved changes and offer to save before leaving.
//!
//! # Invariants
//! - A failed operation never ends the session; only exit or Ctrl-C does.

use crate::commands::{self, CliError, CliResult, MeetingChanges};
use inquire::{Confirm, CustomType, InquireError, Select, Text};
use log::{info, warn};
use std::fmt::{Display, Formatter};
use std::path::Path;
use weekplan_core::{
    load_from_path, save_to_path, Calendar, MeetingId, Priority, TimePoint, MAX_WEEK,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Add,
    ShowWeek,
    ShowAll,
    Update,
    Delete,
    Clear,
    Save,
    Reload,
    Exit,
}

impl MenuAction {
    const ALL: [MenuAction; 9] = [
        Self::Add,
        Self::ShowWeek,
        Self::ShowAll,
        Self::Update,
        Self::Delete,
        Self::Clear,
        Self::Save,
        Self::Reload,
        Self::Exit,
    ];

    fn mutates(self) -> bool {
        matches!(self, Self::Add | Self::Update | Self::Delete | Self::Clear)
    }

    /// Whether a successful run leaves unsaved changes behind.
    ///
    /// Delete and clear can be declined at the prompt, so they only count
    /// when the meeting count moved.
    fn leaves_changes(self, len_before: usize, len_after: usize) -> bool {
        match self {
            Self::Delete | Self::Clear => len_before != len_after,
            other => other.mutates(),
        }
    }
}

impl Display for MenuAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Add => "Add a meeting",
            Self::ShowWeek => "Show one week",
            Self::ShowAll => "Show all weeks",
            Self::Update => "Update a meeting",
            Self::Delete => "Remove a meeting",
            Self::Clear => "Clear the calendar",
            Self::Save => "Save",
            Self::Reload => "Reload from file",
            Self::Exit => "Exit",
        };
        f.write_str(label)
    }
}

/// Runs the menu loop against `calendar`, saving to `data_file` on request.
pub fn run(calendar: &mut Calendar, data_file: &Path) -> CliResult<()> {
    let mut dirty = false;
    info!(
        "event=menu_session module=cli status=start file={}",
        data_file.display()
    );
    loop {
        let action = match Select::new("Choose an option:", MenuAction::ALL.to_vec()).prompt() {
            Ok(action) => action,
            Err(InquireError::OperationCanceled) => MenuAction::Exit,
            Err(err) => return Err(err.into()),
        };
        if action == MenuAction::Exit {
            if dirty && Confirm::new("Save changes before exiting?").with_default(true).prompt()? {
                save_to_path(data_file, calendar)?;
                println!("Saved {}.", data_file.display());
            }
            println!("Thank you!");
            info!("event=menu_session module=cli status=ok");
            return Ok(());
        }

        let len_before = calendar.len();
        match run_action(action, calendar, data_file) {
            Ok(message) => {
                println!("{message}");
                if matches!(action, MenuAction::Save | MenuAction::Reload) {
                    dirty = false;
                } else if action.leaves_changes(len_before, calendar.len()) {
                    dirty = true;
                }
            }
            Err(CliError::Prompt(InquireError::OperationCanceled)) => println!("Cancelled."),
            Err(CliError::Prompt(err)) => return Err(err.into()),
            Err(err) => {
                warn!("event=menu_action module=cli status=error action=\"{action}\" error={err}");
                println!("Error: {err}");
            }
        }
    }
}

fn run_action(action: MenuAction, calendar: &mut Calendar, data_file: &Path) -> CliResult<String> {
    match action {
        MenuAction::Add => {
            let subject = Text::new("Subject:").prompt()?;
            let priority = prompt_priority(Priority::NonCritical)?;
            let start = prompt_time_point("Start", None)?;
            let end = prompt_time_point("End", Some(start))?;
            commands::add(calendar, &subject, priority, start, end)
        }
        MenuAction::ShowWeek => {
            let week = CustomType::<u32>::new("Week:")
                .with_help_message(&format!("1 to {MAX_WEEK}"))
                .with_error_message("Please enter a week number")
                .prompt()?;
            commands::list(calendar, Some(week), false)
        }
        MenuAction::ShowAll => commands::list(calendar, None, false),
        MenuAction::Update => {
            let id = prompt_id("Meeting ID to update:")?;
            let current = calendar.find(id)?.clone();
            println!("{}", crate::report::render_meeting(&current));
            let subject = Text::new("Subject:").with_default(current.subject()).prompt()?;
            let priority = prompt_priority(current.priority())?;
            let start = prompt_time_point("Start", Some(current.start()))?;
            let end = prompt_time_point("End", Some(current.end()))?;
            commands::update(
                calendar,
                id,
                MeetingChanges {
                    subject: Some(subject),
                    priority: Some(priority),
                    start: Some(start),
                    end: Some(end),
                },
            )
        }
        MenuAction::Delete => {
            let id = prompt_id("Meeting ID to remove:")?;
            commands::delete(calendar, id, confirm)
        }
        MenuAction::Clear => commands::clear(calendar, confirm),
        MenuAction::Save => {
            save_to_path(data_file, calendar)?;
            Ok(format!("Saved {} meetings to {}.", calendar.len(), data_file.display()))
        }
        MenuAction::Reload => {
            let loaded = load_from_path(data_file)?;
            calendar.replace_from(loaded.snapshot())?;
            Ok(format!("Loaded {} meetings from {}.", calendar.len(), data_file.display()))
        }
        MenuAction::Exit => Ok(String::new()),
    }
}

fn confirm(message: &str) -> CliResult<bool> {
    Ok(Confirm::new(message).with_default(false).prompt()?)
}

fn prompt_id(message: &str) -> CliResult<MeetingId> {
    Ok(CustomType::<MeetingId>::new(message)
        .with_error_message("Please enter a numeric meeting id")
        .prompt()?)
}

fn prompt_priority(current: Priority) -> CliResult<Priority> {
    let options = vec![Priority::Critical, Priority::NonCritical];
    let cursor = options.iter().position(|p| *p == current).unwrap_or(0);
    Ok(Select::new("Priority:", options)
        .with_starting_cursor(cursor)
        .prompt()?)
}

fn prompt_time_point(label: &str, default: Option<TimePoint>) -> CliResult<TimePoint> {
    let message = format!("{label} (W<week>-D<day>-<hhmm>):");
    let mut prompt = CustomType::<TimePoint>::new(&message)
        .with_help_message("e.g. W1-D2-1400 is week 1, Tuesday, 14:00")
        .with_error_message("Expected W<1-50>-D<1-7>-<0000-2359>");
    if let Some(default) = default {
        prompt = prompt.with_default(default);
    }
    Ok(prompt.prompt()?)
}

#[cfg(test)]
mod tests {
    use super::MenuAction;

    #[test]
    fn only_state_changing_actions_mark_session_dirty() {
        let dirty: Vec<_> = MenuAction::ALL
            .into_iter()
            .filter(|action| action.mutates())
            .collect();
        assert_eq!(
            dirty,
            vec![
                MenuAction::Add,
                MenuAction::Update,
                MenuAction::Delete,
                MenuAction::Clear
            ]
        );
    }

    #[test]
    fn labels_are_distinct() {
        let mut labels: Vec<String> = MenuAction::ALL.iter().map(ToString::to_string).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), MenuAction::ALL.len());
    }

    #[test]
    fn declined_delete_or_clear_leaves_session_clean() {
        assert!(!MenuAction::Delete.leaves_changes(3, 3));
        assert!(!MenuAction::Clear.leaves_changes(3, 3));
        assert!(MenuAction::Delete.leaves_changes(3, 2));
        assert!(MenuAction::Clear.leaves_changes(3, 0));
        assert!(MenuAction::Update.leaves_changes(3, 3));
        assert!(MenuAction::Add.leaves_changes(3, 4));
        assert!(!MenuAction::ShowAll.leaves_changes(3, 3));
    }
}
