//! Meeting repository contracts and in-memory implementation.
//!
//! # Responsibility
//! - Own the meeting collection keyed by id.
//! - Keep lookup by id independent of insertion or deletion order.
//!
//! # Invariants
//! - At most one meeting per id.
//! - The repository stores only assigned meetings; overlap rules are
//!   enforced one layer up, by the calendar service.

use crate::model::meeting::{Meeting, MeetingId};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for meeting storage operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    /// Insert with an id that is already stored.
    DuplicateId(MeetingId),
    /// Insert of a candidate meeting without an id.
    Unassigned,
    NotFound(MeetingId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "meeting id already stored: {id}"),
            Self::Unassigned => write!(f, "meeting has no assigned id"),
            Self::NotFound(id) => write!(f, "meeting not found: {id}"),
        }
    }
}

impl Error for RepoError {}

/// Storage interface for the calendar aggregate.
pub trait MeetingRepository {
    fn insert(&mut self, meeting: Meeting) -> RepoResult<()>;
    fn replace(&mut self, meeting: Meeting) -> RepoResult<Meeting>;
    fn get(&self, id: MeetingId) -> Option<&Meeting>;
    fn remove(&mut self, id: MeetingId) -> RepoResult<Meeting>;
    /// All meetings in ascending id order.
    fn list(&self) -> Vec<&Meeting>;
    fn clear(&mut self);
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn max_id(&self) -> Option<MeetingId> {
        self.list().iter().map(|meeting| meeting.id()).max()
    }
}

/// Ordered map-backed repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryMeetingRepository {
    meetings: BTreeMap<MeetingId, Meeting>,
}

impl InMemoryMeetingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MeetingRepository for InMemoryMeetingRepository {
    fn insert(&mut self, meeting: Meeting) -> RepoResult<()> {
        if !meeting.is_assigned() {
            return Err(RepoError::Unassigned);
        }
        if self.meetings.contains_key(&meeting.id()) {
            return Err(RepoError::DuplicateId(meeting.id()));
        }
        self.meetings.insert(meeting.id(), meeting);
        Ok(())
    }

    fn replace(&mut self, meeting: Meeting) -> RepoResult<Meeting> {
        match self.meetings.get_mut(&meeting.id()) {
            Some(slot) => Ok(std::mem::replace(slot, meeting)),
            None => Err(RepoError::NotFound(meeting.id())),
        }
    }

    fn get(&self, id: MeetingId) -> Option<&Meeting> {
        self.meetings.get(&id)
    }

    fn remove(&mut self, id: MeetingId) -> RepoResult<Meeting> {
        self.meetings.remove(&id).ok_or(RepoError::NotFound(id))
    }

    fn list(&self) -> Vec<&Meeting> {
        self.meetings.values().collect()
    }

    fn clear(&mut self) {
        self.meetings.clear();
    }

    fn len(&self) -> usize {
        self.meetings.len()
    }

    fn max_id(&self) -> Option<MeetingId> {
        self.meetings.keys().next_back().copied()
    }
}
