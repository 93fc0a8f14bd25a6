//! Core domain logic for the weekplan meeting calendar.
//! This crate is the single source of truth for scheduling invariants.

pub mod codec;
pub mod conflict;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use codec::{
    decode, decode_legacy, encode, import_legacy_from_path, load_from_path, load_or_default,
    save_to_path, DecodeError, DecodeErrorKind, StoreError, StoreResult,
};
pub use conflict::index::{find_conflicts, overlaps, ConflictIndex, Span};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::meeting::{
    Meeting, MeetingId, MeetingValidationError, ParsePriorityError, Priority, UNASSIGNED_ID,
};
pub use model::time_point::{day_name, TimePoint, TimePointError, DAYS_PER_WEEK, MAX_WEEK};
pub use repo::meeting_repo::{InMemoryMeetingRepository, MeetingRepository, RepoError, RepoResult};
pub use service::calendar::{
    Calendar, CalendarError, CalendarResult, CalendarSnapshot, DayListing, RestoreError,
    WeekListing, FIRST_MEETING_ID,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
