//! Meeting domain model.
//!
//! # Responsibility
//! - Define the meeting record owned by the calendar aggregate.
//! - Validate subject and span before a value can exist.
//!
//! # Invariants
//! - `subject` is trimmed, non-empty and single-line.
//! - `start < end` under [`TimePoint`] ordering (positive duration).
//! - `id` is assigned by the calendar; `UNASSIGNED_ID` marks candidates.

use crate::model::time_point::TimePoint;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Calendar-assigned meeting identifier.
pub type MeetingId = u64;

/// Id carried by candidate meetings before the calendar stores them.
pub const UNASSIGNED_ID: MeetingId = 0;

/// Meeting importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    #[default]
    NonCritical,
}

impl Priority {
    /// Stable lowercase label used by the flat file format and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::NonCritical => "non-critical",
        }
    }

    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Critical)
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown priority label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePriorityError(pub String);

impl Display for ParsePriorityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported priority `{}`; expected critical|non-critical",
            self.0
        )
    }
}

impl Error for ParsePriorityError {}

impl FromStr for Priority {
    type Err = ParsePriorityError;

    /// Accepts `critical|non-critical` and the boolean answers `true|false`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" | "true" => Ok(Self::Critical),
            "non-critical" | "noncritical" | "non_critical" | "false" => Ok(Self::NonCritical),
            other => Err(ParsePriorityError(other.to_string())),
        }
    }
}

/// Validation failure for meeting construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeetingValidationError {
    /// Subject is empty after trimming.
    EmptySubject,
    /// Subject contains a line break.
    MultilineSubject,
    /// `end` is not strictly after `start`.
    NonPositiveDuration { start: TimePoint, end: TimePoint },
}

impl Display for MeetingValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySubject => write!(f, "meeting subject must not be blank"),
            Self::MultilineSubject => write!(f, "meeting subject must be a single line"),
            Self::NonPositiveDuration { start, end } => {
                write!(f, "meeting end ({end}) must be after start ({start})")
            }
        }
    }
}

impl Error for MeetingValidationError {}

/// One scheduled meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMeeting")]
pub struct Meeting {
    id: MeetingId,
    subject: String,
    priority: Priority,
    start: TimePoint,
    end: TimePoint,
}

impl Meeting {
    /// Creates an unassigned candidate meeting.
    pub fn new(
        subject: impl Into<String>,
        priority: Priority,
        start: TimePoint,
        end: TimePoint,
    ) -> Result<Self, MeetingValidationError> {
        Self::with_id(UNASSIGNED_ID, subject, priority, start, end)
    }

    /// Creates a meeting with a known id.
    ///
    /// Used by restore/decode paths where identity already exists.
    pub fn with_id(
        id: MeetingId,
        subject: impl Into<String>,
        priority: Priority,
        start: TimePoint,
        end: TimePoint,
    ) -> Result<Self, MeetingValidationError> {
        let subject = normalize_subject(subject.into())?;
        if start >= end {
            return Err(MeetingValidationError::NonPositiveDuration { start, end });
        }
        Ok(Self {
            id,
            subject,
            priority,
            start,
            end,
        })
    }

    pub fn id(&self) -> MeetingId {
        self.id
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn start(&self) -> TimePoint {
        self.start
    }

    pub fn end(&self) -> TimePoint {
        self.end
    }

    pub fn is_assigned(&self) -> bool {
        self.id != UNASSIGNED_ID
    }

    /// Length of the span in minutes; always positive.
    pub fn duration_minutes(&self) -> u32 {
        self.end.minute_of_calendar() - self.start.minute_of_calendar()
    }

    /// Returns a copy spanning `[start, end)`, keeping id and details.
    pub fn with_updated_span(
        &self,
        start: TimePoint,
        end: TimePoint,
    ) -> Result<Self, MeetingValidationError> {
        Self::with_id(self.id, self.subject.clone(), self.priority, start, end)
    }

    /// Returns a copy with new subject and priority, keeping id and span.
    pub fn with_updated_details(
        &self,
        subject: impl Into<String>,
        priority: Priority,
    ) -> Result<Self, MeetingValidationError> {
        Self::with_id(self.id, subject, priority, self.start, self.end)
    }

    pub(crate) fn assign_id(mut self, id: MeetingId) -> Self {
        self.id = id;
        self
    }
}

fn normalize_subject(subject: String) -> Result<String, MeetingValidationError> {
    let trimmed = subject.trim();
    if trimmed.is_empty() {
        return Err(MeetingValidationError::EmptySubject);
    }
    if trimmed.contains(['\n', '\r']) {
        return Err(MeetingValidationError::MultilineSubject);
    }
    Ok(trimmed.to_string())
}

#[derive(Deserialize)]
struct RawMeeting {
    id: MeetingId,
    subject: String,
    priority: Priority,
    start: TimePoint,
    end: TimePoint,
}

impl TryFrom<RawMeeting> for Meeting {
    type Error = MeetingValidationError;

    fn try_from(value: RawMeeting) -> Result<Self, Self::Error> {
        Self::with_id(value.id, value.subject, value.priority, value.start, value.end)
    }
}

#[cfg(test)]
mod tests {
    use super::{Meeting, MeetingValidationError, Priority, UNASSIGNED_ID};
    use crate::model::time_point::TimePoint;

    fn tp(week: u32, day: u32, time: u32) -> TimePoint {
        TimePoint::new(week, day, time).unwrap()
    }

    #[test]
    fn new_meeting_is_unassigned_and_trimmed() {
        let meeting =
            Meeting::new("  standup ", Priority::Critical, tp(1, 2, 900), tp(1, 2, 915)).unwrap();
        assert_eq!(meeting.id(), UNASSIGNED_ID);
        assert!(!meeting.is_assigned());
        assert_eq!(meeting.subject(), "standup");
        assert_eq!(meeting.duration_minutes(), 15);
    }

    #[test]
    fn rejects_blank_and_multiline_subjects() {
        let err = Meeting::new("   ", Priority::NonCritical, tp(1, 1, 900), tp(1, 1, 1000))
            .unwrap_err();
        assert_eq!(err, MeetingValidationError::EmptySubject);

        let err = Meeting::new("a\nb", Priority::NonCritical, tp(1, 1, 900), tp(1, 1, 1000))
            .unwrap_err();
        assert_eq!(err, MeetingValidationError::MultilineSubject);
    }

    #[test]
    fn rejects_zero_and_negative_duration() {
        let same = tp(1, 1, 900);
        assert!(matches!(
            Meeting::new("x", Priority::NonCritical, same, same),
            Err(MeetingValidationError::NonPositiveDuration { .. })
        ));
        assert!(matches!(
            Meeting::new("x", Priority::NonCritical, tp(1, 2, 0), tp(1, 1, 2330)),
            Err(MeetingValidationError::NonPositiveDuration { .. })
        ));
    }

    #[test]
    fn spans_across_midnight_and_weeks_are_valid() {
        let overnight =
            Meeting::new("late", Priority::NonCritical, tp(1, 1, 2330), tp(1, 2, 200)).unwrap();
        assert_eq!(overnight.duration_minutes(), 150);

        let weekend =
            Meeting::new("retreat", Priority::Critical, tp(2, 6, 1800), tp(3, 1, 1200)).unwrap();
        assert_eq!(weekend.duration_minutes(), 42 * 60);
    }

    #[test]
    fn updated_copies_keep_identity() {
        let meeting = Meeting::with_id(
            7,
            "review",
            Priority::NonCritical,
            tp(1, 3, 1000),
            tp(1, 3, 1100),
        )
        .unwrap();

        let moved = meeting.with_updated_span(tp(1, 4, 1000), tp(1, 4, 1030)).unwrap();
        assert_eq!(moved.id(), 7);
        assert_eq!(moved.subject(), "review");
        assert_eq!(moved.start(), tp(1, 4, 1000));

        let renamed = meeting.with_updated_details("design review", Priority::Critical).unwrap();
        assert_eq!(renamed.id(), 7);
        assert_eq!(renamed.priority(), Priority::Critical);
        assert_eq!(renamed.end(), tp(1, 3, 1100));

        assert!(meeting.with_updated_span(tp(1, 4, 1000), tp(1, 4, 1000)).is_err());
    }

    #[test]
    fn priority_parses_labels_and_booleans() {
        assert_eq!("Critical".parse::<Priority>().unwrap(), Priority::Critical);
        assert_eq!("true".parse::<Priority>().unwrap(), Priority::Critical);
        assert_eq!("non-critical".parse::<Priority>().unwrap(), Priority::NonCritical);
        assert_eq!("false".parse::<Priority>().unwrap(), Priority::NonCritical);
        assert!("urgent".parse::<Priority>().is_err());
    }
}
