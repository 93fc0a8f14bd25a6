//! Calendar operations shared by one-shot subcommands and the menu.
//!
//! # Responsibility
//! - Translate user-level requests into Calendar API calls.
//! - Produce the text shown to the user.
//!
//! # Invariants
//! - Destructive operations ask the caller for confirmation before they call
//!   into the calendar, never after.

use crate::config::ConfigError;
use crate::report;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use weekplan_core::{
    import_legacy_from_path, Calendar, CalendarError, LoggingError, MeetingId, Priority,
    StoreError, TimePoint,
};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub enum CliError {
    Calendar(CalendarError),
    Store(StoreError),
    Config(ConfigError),
    Logging(LoggingError),
    Prompt(inquire::InquireError),
    Json(serde_json::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Calendar(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "calendar file error: {err}"),
            Self::Config(err) => write!(f, "{err}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Prompt(err) => write!(f, "prompt failed: {err}"),
            Self::Json(err) => write!(f, "failed to render json: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Calendar(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::Prompt(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<CalendarError> for CliError {
    fn from(value: CalendarError) -> Self {
        Self::Calendar(value)
    }
}

impl From<StoreError> for CliError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<inquire::InquireError> for CliError {
    fn from(value: inquire::InquireError) -> Self {
        Self::Prompt(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Fields to change in an update; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct MeetingChanges {
    pub subject: Option<String>,
    pub priority: Option<Priority>,
    pub start: Option<TimePoint>,
    pub end: Option<TimePoint>,
}

pub fn add(
    calendar: &mut Calendar,
    subject: &str,
    priority: Priority,
    start: TimePoint,
    end: TimePoint,
) -> CliResult<String> {
    let id = calendar.create(subject, priority, start, end)?;
    Ok(format!("Created meeting {id}."))
}

/// Lists one week, or every week with meetings when `week` is `None`.
pub fn list(calendar: &Calendar, week: Option<u32>, json: bool) -> CliResult<String> {
    let weeks = match week {
        Some(week) => vec![week],
        None => calendar.active_weeks(),
    };
    let listings = weeks
        .into_iter()
        .map(|week| calendar.list_by_day(week))
        .collect::<Result<Vec<_>, _>>()?;
    if json {
        return Ok(report::render_json(&listings)?);
    }
    Ok(match week {
        Some(_) => listings.iter().map(report::render_week).collect(),
        None => report::render_weeks(&listings),
    })
}

pub fn show(calendar: &Calendar, id: MeetingId) -> CliResult<String> {
    Ok(report::render_meeting(calendar.find(id)?))
}

pub fn update(
    calendar: &mut Calendar,
    id: MeetingId,
    changes: MeetingChanges,
) -> CliResult<String> {
    let current = calendar.find(id)?.clone();
    calendar.update(
        id,
        changes.subject.unwrap_or_else(|| current.subject().to_string()),
        changes.priority.unwrap_or(current.priority()),
        changes.start.unwrap_or(current.start()),
        changes.end.unwrap_or(current.end()),
    )?;
    Ok(format!("Updated meeting {id}."))
}

/// Shows meeting `id`, asks `confirm`, and only then deletes it.
pub fn delete<F>(calendar: &mut Calendar, id: MeetingId, confirm: F) -> CliResult<String>
where
    F: FnOnce(&str) -> CliResult<bool>,
{
    let details = report::render_meeting(calendar.find(id)?);
    let prompt = format!("{details}Are you sure you want to remove this?");
    if !confirm(&prompt)? {
        return Ok(format!("Kept meeting {id}."));
    }
    calendar.delete(id)?;
    Ok(format!("Deleted meeting {id}."))
}

pub fn clear<F>(calendar: &mut Calendar, confirm: F) -> CliResult<String>
where
    F: FnOnce(&str) -> CliResult<bool>,
{
    let count = calendar.len();
    if count == 0 {
        return Ok("Calendar is already empty.".to_string());
    }
    if !confirm(&format!("Remove all {count} meetings?"))? {
        return Ok("Kept all meetings.".to_string());
    }
    calendar.clear();
    Ok(format!("Removed {count} meetings."))
}

/// Replaces calendar content with a legacy file, keeping the id sequence.
pub fn import_legacy(calendar: &mut Calendar, path: &Path) -> CliResult<String> {
    let snapshot = import_legacy_from_path(path)?;
    let count = snapshot.meetings.len();
    calendar.replace_from(snapshot)?;
    Ok(format!("Imported {count} meetings from {}.", path.display()))
}

#[cfg(test)]
mod tests {
    use super::{add, clear, delete, import_legacy, list, update, CliError, MeetingChanges};
    use weekplan_core::{Calendar, CalendarError, Priority, TimePoint};

    fn tp(week: u32, day: u32, time: u32) -> TimePoint {
        TimePoint::new(week, day, time).unwrap()
    }

    #[test]
    fn add_reports_conflict_as_calendar_error() {
        let mut calendar = Calendar::new();
        let message =
            add(&mut calendar, "a", Priority::Critical, tp(1, 2, 1400), tp(1, 2, 1530)).unwrap();
        assert_eq!(message, "Created meeting 1.");

        let err = add(&mut calendar, "b", Priority::Critical, tp(1, 2, 1300), tp(1, 2, 1430))
            .unwrap_err();
        assert!(matches!(
            err,
            CliError::Calendar(CalendarError::Conflict { ref conflicting_ids })
                if conflicting_ids == &vec![1]
        ));
        assert!(err.to_string().contains("overlaps existing meeting(s): 1"));
    }

    #[test]
    fn update_keeps_unspecified_fields() {
        let mut calendar = Calendar::new();
        add(&mut calendar, "a", Priority::Critical, tp(1, 2, 1400), tp(1, 2, 1530)).unwrap();

        update(
            &mut calendar,
            1,
            MeetingChanges {
                end: Some(tp(1, 2, 1600)),
                ..MeetingChanges::default()
            },
        )
        .unwrap();

        let meeting = calendar.find(1).unwrap();
        assert_eq!(meeting.subject(), "a");
        assert_eq!(meeting.priority(), Priority::Critical);
        assert_eq!(meeting.start(), tp(1, 2, 1400));
        assert_eq!(meeting.end(), tp(1, 2, 1600));
    }

    #[test]
    fn delete_respects_confirmation_answer() {
        let mut calendar = Calendar::new();
        add(&mut calendar, "a", Priority::Critical, tp(1, 2, 1400), tp(1, 2, 1530)).unwrap();

        let message = delete(&mut calendar, 1, |prompt| {
            assert!(prompt.contains("Subject: a"));
            Ok(false)
        })
        .unwrap();
        assert_eq!(message, "Kept meeting 1.");
        assert_eq!(calendar.len(), 1);

        let message = delete(&mut calendar, 1, |_| Ok(true)).unwrap();
        assert_eq!(message, "Deleted meeting 1.");
        assert!(calendar.is_empty());

        let err = delete(&mut calendar, 1, |_| panic!("must not prompt for unknown id"));
        assert!(matches!(err, Err(CliError::Calendar(CalendarError::NotFound(1)))));
    }

    #[test]
    fn clear_skips_prompt_when_empty() {
        let mut calendar = Calendar::new();
        let message = clear(&mut calendar, |_| panic!("nothing to confirm")).unwrap();
        assert_eq!(message, "Calendar is already empty.");

        add(&mut calendar, "a", Priority::Critical, tp(1, 2, 1400), tp(1, 2, 1530)).unwrap();
        assert_eq!(clear(&mut calendar, |_| Ok(true)).unwrap(), "Removed 1 meetings.");
        assert_eq!(calendar.next_id(), 2);
    }

    #[test]
    fn list_without_week_covers_active_weeks() {
        let mut calendar = Calendar::new();
        assert_eq!(list(&calendar, None, false).unwrap(), "No meetings scheduled.\n");

        add(&mut calendar, "a", Priority::Critical, tp(2, 1, 900), tp(2, 1, 1000)).unwrap();
        let text = list(&calendar, None, false).unwrap();
        assert!(text.starts_with("Week 2\n"));
        assert!(matches!(
            list(&calendar, Some(0), false),
            Err(CliError::Calendar(CalendarError::Range(_)))
        ));
    }

    #[test]
    fn import_legacy_replaces_content_without_reusing_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.txt");
        std::fs::write(&path, "0 standup 1 900 915
1 review 3 1400 1530
").unwrap();

        let mut calendar = Calendar::new();
        for day in 1..=4 {
            add(&mut calendar, "x", Priority::NonCritical, tp(2, day, 800), tp(2, day, 900))
                .unwrap();
        }

        let message = import_legacy(&mut calendar, &path).unwrap();
        assert!(message.starts_with("Imported 2 meetings"));
        assert_eq!(calendar.len(), 2);
        assert_eq!(calendar.find(1).unwrap().subject(), "standup");
        assert_eq!(calendar.next_id(), 5);
    }
}
