//! Calendar aggregate service.
//!
//! # Responsibility
//! - Provide the only mutation path over the meeting collection.
//! - Assign meeting ids and enforce the no-overlap rule on every write.
//! - Derive per-day and per-week listings from current state.
//!
//! # Invariants
//! - No two stored meetings overlap (half-open spans).
//! - `next_id` starts at 1, only grows, and is never handed out twice,
//!   including after `delete` and `clear`.
//! - A failed call leaves the collection and `next_id` untouched.

use crate::conflict::index::{find_conflicts, ConflictIndex, Span};
use crate::model::meeting::{Meeting, MeetingId, MeetingValidationError, Priority};
use crate::model::time_point::{day_name, TimePoint, TimePointError, DAYS_PER_WEEK};
use crate::repo::meeting_repo::{InMemoryMeetingRepository, MeetingRepository, RepoError};
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// First id handed out by a fresh calendar.
pub const FIRST_MEETING_ID: MeetingId = 1;

pub type CalendarResult<T> = Result<T, CalendarError>;

/// Reason a snapshot cannot become calendar state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreError {
    /// Snapshot contains a meeting without an id.
    UnassignedMeeting,
    /// Two meetings share one id.
    DuplicateId(MeetingId),
    /// Two meetings overlap.
    Overlap { first: MeetingId, second: MeetingId },
    /// `next_id` would hand out an id already in use.
    NextIdTooLow { next_id: MeetingId, max_id: MeetingId },
}

impl Display for RestoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnassignedMeeting => write!(f, "snapshot contains a meeting without id"),
            Self::DuplicateId(id) => write!(f, "snapshot contains duplicate meeting id {id}"),
            Self::Overlap { first, second } => {
                write!(f, "snapshot meetings {first} and {second} overlap")
            }
            Self::NextIdTooLow { next_id, max_id } => write!(
                f,
                "snapshot next_id {next_id} must be greater than highest id {max_id}"
            ),
        }
    }
}

impl Error for RestoreError {}

/// Error returned by calendar operations. Every variant is recoverable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// Input time point out of range.
    Range(TimePointError),
    /// Subject or span rejected by meeting validation.
    Validation(MeetingValidationError),
    /// Candidate span overlaps stored meetings.
    Conflict { conflicting_ids: Vec<MeetingId> },
    NotFound(MeetingId),
    Restore(RestoreError),
    /// Storage contract violation.
    Repo(RepoError),
    /// Every id up to `MeetingId::MAX` has been handed out.
    IdsExhausted,
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Range(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Conflict { conflicting_ids } => {
                let ids = conflicting_ids
                    .iter()
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "meeting overlaps existing meeting(s): {ids}")
            }
            Self::NotFound(id) => write!(f, "meeting not found: {id}"),
            Self::Restore(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::IdsExhausted => write!(f, "no meeting ids left to assign"),
        }
    }
}

impl Error for CalendarError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Range(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Restore(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Conflict { .. } | Self::NotFound(_) | Self::IdsExhausted => None,
        }
    }
}

impl From<TimePointError> for CalendarError {
    fn from(value: TimePointError) -> Self {
        Self::Range(value)
    }
}

impl From<MeetingValidationError> for CalendarError {
    fn from(value: MeetingValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RestoreError> for CalendarError {
    fn from(value: RestoreError) -> Self {
        Self::Restore(value)
    }
}

impl From<RepoError> for CalendarError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Full calendar state as exchanged with persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSnapshot {
    /// Next id the calendar will assign.
    pub next_id: MeetingId,
    /// Stored meetings in ascending id order.
    pub meetings: Vec<Meeting>,
}

/// Meetings starting on one day of a week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayListing {
    pub day: u32,
    pub day_name: &'static str,
    /// Ordered by start time, then id.
    pub meetings: Vec<Meeting>,
}

impl DayListing {
    pub fn count(&self) -> usize {
        self.meetings.len()
    }
}

/// Seven day listings of one week plus the week total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekListing {
    pub week: u32,
    /// Always seven entries, day 1 through day 7.
    pub days: Vec<DayListing>,
    pub total: usize,
}

/// Calendar aggregate over a meeting repository.
#[derive(Debug, Clone)]
pub struct Calendar<R: MeetingRepository = InMemoryMeetingRepository> {
    repo: R,
    next_id: MeetingId,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new()
    }
}

impl Calendar {
    /// Creates an empty in-memory calendar.
    pub fn new() -> Self {
        Self {
            repo: InMemoryMeetingRepository::new(),
            next_id: FIRST_MEETING_ID,
        }
    }

    /// Rebuilds a calendar from a snapshot.
    ///
    /// # Errors
    /// - `CalendarError::Restore` when meetings are unassigned, share ids,
    ///   overlap, or `next_id` is not above every stored id.
    pub fn restore(snapshot: CalendarSnapshot) -> CalendarResult<Self> {
        let max_id = validate_snapshot(&snapshot)?;
        let mut repo = InMemoryMeetingRepository::new();
        for meeting in snapshot.meetings {
            repo.insert(meeting)?;
        }
        // Validation already guarantees `next_id` is above every stored id.
        let next_id = snapshot.next_id.max(FIRST_MEETING_ID);
        info!(
            "event=calendar_restore module=calendar status=ok meetings={} next_id={}",
            repo.len(),
            next_id
        );
        Ok(Self { repo, next_id })
    }

    /// Replaces current state with `snapshot` after validating all of it.
    ///
    /// `next_id` never moves backwards, so ids issued before the reload stay
    /// retired.
    pub fn replace_from(&mut self, snapshot: CalendarSnapshot) -> CalendarResult<()> {
        let mut restored = Self::restore(snapshot)?;
        restored.next_id = restored.next_id.max(self.next_id);
        *self = restored;
        Ok(())
    }
}

impl<R: MeetingRepository> Calendar<R> {
    /// Wraps an existing repository.
    ///
    /// # Errors
    /// - `CalendarError::Restore` when stored meetings overlap.
    /// - `CalendarError::IdsExhausted` when the repository holds `MeetingId::MAX`.
    pub fn with_repository(repo: R) -> CalendarResult<Self> {
        if let Some((first, second)) = ConflictIndex::build(repo.list()).first_overlapping_pair() {
            return Err(RestoreError::Overlap { first, second }.into());
        }
        let next_id = match repo.max_id() {
            Some(max_id) => max_id.checked_add(1).ok_or(CalendarError::IdsExhausted)?,
            None => FIRST_MEETING_ID,
        };
        Ok(Self { repo, next_id })
    }

    /// Id the next successful `create` will assign.
    pub fn next_id(&self) -> MeetingId {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.repo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repo.is_empty()
    }

    /// Schedules a new meeting and returns its id.
    ///
    /// # Errors
    /// - `Validation` for blank subject or non-positive duration.
    /// - `Conflict` listing every overlapping meeting id.
    /// - `IdsExhausted` once `next_id` reaches `MeetingId::MAX`.
    pub fn create(
        &mut self,
        subject: impl Into<String>,
        priority: Priority,
        start: TimePoint,
        end: TimePoint,
    ) -> CalendarResult<MeetingId> {
        let candidate = Meeting::new(subject, priority, start, end)
            .inspect_err(|err| log_rejected("meeting_create", None, err))?;
        self.ensure_admissible(&candidate, None, "meeting_create")?;

        let id = self.next_id;
        let Some(following) = id.checked_add(1) else {
            log_rejected("meeting_create", None, &CalendarError::IdsExhausted);
            return Err(CalendarError::IdsExhausted);
        };
        self.repo.insert(candidate.assign_id(id))?;
        self.next_id = following;
        info!(
            "event=meeting_create module=calendar status=ok id={} start={} end={}",
            id, start, end
        );
        Ok(id)
    }

    /// Replaces subject, priority and span of meeting `id`.
    ///
    /// The meeting's own previous span never counts as a conflict.
    pub fn update(
        &mut self,
        id: MeetingId,
        subject: impl Into<String>,
        priority: Priority,
        start: TimePoint,
        end: TimePoint,
    ) -> CalendarResult<()> {
        if self.repo.get(id).is_none() {
            log_rejected("meeting_update", Some(id), &CalendarError::NotFound(id));
            return Err(CalendarError::NotFound(id));
        }
        let candidate = Meeting::with_id(id, subject, priority, start, end)
            .inspect_err(|err| log_rejected("meeting_update", Some(id), err))?;
        self.ensure_admissible(&candidate, Some(id), "meeting_update")?;

        self.repo.replace(candidate)?;
        info!(
            "event=meeting_update module=calendar status=ok id={} start={} end={}",
            id, start, end
        );
        Ok(())
    }

    /// Removes meeting `id` and returns it.
    pub fn delete(&mut self, id: MeetingId) -> CalendarResult<Meeting> {
        let removed = self
            .repo
            .remove(id)
            .inspect_err(|err| log_rejected("meeting_delete", Some(id), err))?;
        info!("event=meeting_delete module=calendar status=ok id={id}");
        Ok(removed)
    }

    /// Removes every meeting. Issued ids stay retired.
    pub fn clear(&mut self) {
        let removed = self.repo.len();
        self.repo.clear();
        info!(
            "event=calendar_clear module=calendar status=ok removed={} next_id={}",
            removed, self.next_id
        );
    }

    pub fn find(&self, id: MeetingId) -> CalendarResult<&Meeting> {
        self.repo.get(id).ok_or(CalendarError::NotFound(id))
    }

    /// All meetings ordered by start, then id.
    pub fn list(&self) -> Vec<Meeting> {
        let mut meetings: Vec<Meeting> = self.repo.list().into_iter().cloned().collect();
        meetings.sort_by_key(|meeting| (meeting.start(), meeting.id()));
        meetings
    }

    /// Weeks in which at least one meeting starts, ascending.
    pub fn active_weeks(&self) -> Vec<u32> {
        let mut weeks: Vec<u32> = self
            .repo
            .list()
            .iter()
            .map(|meeting| meeting.start().week())
            .collect();
        weeks.sort_unstable();
        weeks.dedup();
        weeks
    }

    /// Groups meetings starting in `week` by start day.
    ///
    /// A meeting spanning several days is listed once, under its start day.
    ///
    /// # Errors
    /// - `Range` when `week` is outside `1..=50`.
    pub fn list_by_day(&self, week: u32) -> CalendarResult<WeekListing> {
        TimePoint::new(week, 1, 0)?;

        let mut days: Vec<DayListing> = (1..=DAYS_PER_WEEK)
            .filter_map(|day| {
                day_name(day).map(|name| DayListing {
                    day,
                    day_name: name,
                    meetings: Vec::new(),
                })
            })
            .collect();
        let mut total = 0;
        for meeting in self.list() {
            if meeting.start().week() != week {
                continue;
            }
            let slot = (meeting.start().day() - 1) as usize;
            days[slot].meetings.push(meeting);
            total += 1;
        }

        Ok(WeekListing { week, days, total })
    }

    /// Copies current state for persistence.
    pub fn snapshot(&self) -> CalendarSnapshot {
        CalendarSnapshot {
            next_id: self.next_id,
            meetings: self.repo.list().into_iter().cloned().collect(),
        }
    }

    fn ensure_admissible(
        &self,
        candidate: &Meeting,
        exclude: Option<MeetingId>,
        event: &str,
    ) -> CalendarResult<()> {
        let conflicts = find_conflicts(Span::of(candidate), self.repo.list(), exclude);
        if conflicts.is_empty() {
            return Ok(());
        }
        let err = CalendarError::Conflict {
            conflicting_ids: conflicts.iter().map(Meeting::id).collect(),
        };
        log_rejected(event, exclude, &err);
        Err(err)
    }
}

fn validate_snapshot(snapshot: &CalendarSnapshot) -> Result<Option<MeetingId>, RestoreError> {
    let mut max_id: Option<MeetingId> = None;
    let mut seen = std::collections::HashSet::new();
    for meeting in &snapshot.meetings {
        if !meeting.is_assigned() {
            return Err(RestoreError::UnassignedMeeting);
        }
        if !seen.insert(meeting.id()) {
            return Err(RestoreError::DuplicateId(meeting.id()));
        }
        max_id = max_id.max(Some(meeting.id()));
    }
    if let Some(max_id) = max_id {
        if snapshot.next_id <= max_id {
            return Err(RestoreError::NextIdTooLow {
                next_id: snapshot.next_id,
                max_id,
            });
        }
    }
    if let Some((first, second)) =
        ConflictIndex::build(snapshot.meetings.iter()).first_overlapping_pair()
    {
        return Err(RestoreError::Overlap { first, second });
    }
    Ok(max_id)
}

fn log_rejected(event: &str, id: Option<MeetingId>, err: &dyn Display) {
    match id {
        Some(id) => info!("event={event} module=calendar status=rejected id={id} reason={err}"),
        None => info!("event={event} module=calendar status=rejected reason={err}"),
    }
}
