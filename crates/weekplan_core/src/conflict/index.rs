//! Half-open span overlap checks over stored meetings.
//!
//! # Responsibility
//! - Provide the single overlap rule used by every calendar mutation.
//! - Find all meetings blocking a candidate span, optionally ignoring one id.
//!
//! # Invariants
//! - `overlaps` is symmetric.
//! - Returned conflicts are ordered by start, then id.

use crate::model::meeting::{Meeting, MeetingId};
use crate::model::time_point::TimePoint;

/// Half-open interval `[start, end)` on the calendar timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: TimePoint,
    pub end: TimePoint,
}

impl Span {
    pub fn new(start: TimePoint, end: TimePoint) -> Self {
        Self { start, end }
    }

    pub fn of(meeting: &Meeting) -> Self {
        Self::new(meeting.start(), meeting.end())
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        overlaps(self.start, self.end, other.start, other.end)
    }
}

/// Returns whether `[a_start, a_end)` and `[b_start, b_end)` intersect.
///
/// Spans crossing midnight or a week boundary need no special handling:
/// `TimePoint` ordering is already the linear timeline order.
pub fn overlaps(
    a_start: TimePoint,
    a_end: TimePoint,
    b_start: TimePoint,
    b_end: TimePoint,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Returns every meeting in `meetings` overlapping `candidate`, except the
/// one whose id equals `exclude`.
pub fn find_conflicts<'a, I>(
    candidate: Span,
    meetings: I,
    exclude: Option<MeetingId>,
) -> Vec<Meeting>
where
    I: IntoIterator<Item = &'a Meeting>,
{
    ConflictIndex::build(meetings).conflicts_with(candidate, exclude)
}

/// Start-ordered view over a meeting set for repeated conflict queries.
#[derive(Debug, Clone, Default)]
pub struct ConflictIndex<'a> {
    by_start: Vec<&'a Meeting>,
}

impl<'a> ConflictIndex<'a> {
    pub fn build<I>(meetings: I) -> Self
    where
        I: IntoIterator<Item = &'a Meeting>,
    {
        let mut by_start: Vec<&'a Meeting> = meetings.into_iter().collect();
        by_start.sort_by_key(|meeting| (meeting.start(), meeting.id()));
        Self { by_start }
    }

    pub fn len(&self) -> usize {
        self.by_start.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_start.is_empty()
    }

    /// Returns meetings overlapping `candidate`, skipping `exclude`.
    pub fn conflicts_with(&self, candidate: Span, exclude: Option<MeetingId>) -> Vec<Meeting> {
        // Only meetings starting before the candidate ends can overlap it.
        let upper = self
            .by_start
            .partition_point(|meeting| meeting.start() < candidate.end);
        self.by_start[..upper]
            .iter()
            .filter(|meeting| Some(meeting.id()) != exclude)
            .filter(|meeting| Span::of(meeting).overlaps(&candidate))
            .map(|meeting| (*meeting).clone())
            .collect()
    }

    /// Returns the first pair of distinct meetings that overlap, if any.
    pub fn first_overlapping_pair(&self) -> Option<(MeetingId, MeetingId)> {
        // With meetings sorted by start, any overlap shows up between a
        // meeting and the latest-ending meeting seen before it.
        let mut latest: Option<&Meeting> = None;
        for meeting in &self.by_start {
            if let Some(previous) = latest {
                if meeting.start() < previous.end() {
                    return Some((previous.id(), meeting.id()));
                }
            }
            if latest.map_or(true, |previous| meeting.end() > previous.end()) {
                latest = Some(meeting);
            }
        }
        None
    }
}
