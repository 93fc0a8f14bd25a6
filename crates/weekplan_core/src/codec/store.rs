//! Calendar file save/load.
//!
//! # Responsibility
//! - Overwrite a calendar file with the current snapshot.
//! - Load a calendar file into a fresh, fully validated calendar.
//!
//! # Invariants
//! - A failed load never yields a partially populated calendar.
//! - Every call emits start and end log events with duration.

use super::flat_file::{decode, decode_legacy, encode};
use super::{StoreError, StoreResult};
use crate::repo::meeting_repo::MeetingRepository;
use crate::service::calendar::{Calendar, CalendarSnapshot};
use log::{error, info};
use std::path::Path;
use std::time::Instant;

/// Writes the whole calendar to `path`, replacing any previous content.
pub fn save_to_path<R: MeetingRepository>(
    path: impl AsRef<Path>,
    calendar: &Calendar<R>,
) -> StoreResult<()> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!("event=calendar_save module=codec status=start");

    let text = encode(&calendar.snapshot());
    match std::fs::write(path, text) {
        Ok(()) => {
            info!(
                "event=calendar_save module=codec status=ok duration_ms={} meetings={}",
                started_at.elapsed().as_millis(),
                calendar.len()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=calendar_save module=codec status=error duration_ms={} error_code=write_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err.into())
        }
    }
}

/// Reads and validates the calendar stored at `path`.
///
/// # Errors
/// - `Io` when the file cannot be read.
/// - `Decode` when the content is malformed.
/// - `Restore` when records are well-formed but overlap or repeat ids.
pub fn load_from_path(path: impl AsRef<Path>) -> StoreResult<Calendar> {
    let started_at = Instant::now();
    info!("event=calendar_load module=codec status=start mode=current");

    let result = read_snapshot(path.as_ref(), decode).and_then(|snapshot| {
        Calendar::restore(snapshot).map_err(StoreError::from)
    });
    log_load_outcome("current", started_at, &result);
    result
}

/// Like [`load_from_path`], but a missing file yields an empty calendar.
pub fn load_or_default(path: impl AsRef<Path>) -> StoreResult<Calendar> {
    let path = path.as_ref();
    if !path.exists() {
        info!("event=calendar_load module=codec status=ok mode=new meetings=0");
        return Ok(Calendar::new());
    }
    load_from_path(path)
}

/// Reads a file in the legacy five-field layout.
///
/// Returns the snapshot without applying it so the caller decides how to
/// merge it into live state.
pub fn import_legacy_from_path(path: impl AsRef<Path>) -> StoreResult<CalendarSnapshot> {
    let started_at = Instant::now();
    info!("event=calendar_load module=codec status=start mode=legacy");

    let result = read_snapshot(path.as_ref(), decode_legacy);
    match &result {
        Ok(snapshot) => info!(
            "event=calendar_load module=codec status=ok mode=legacy duration_ms={} meetings={}",
            started_at.elapsed().as_millis(),
            snapshot.meetings.len()
        ),
        Err(err) => error!(
            "event=calendar_load module=codec status=error mode=legacy duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn read_snapshot(
    path: &Path,
    decoder: fn(&str) -> Result<CalendarSnapshot, super::DecodeError>,
) -> StoreResult<CalendarSnapshot> {
    let text = std::fs::read_to_string(path)?;
    Ok(decoder(&text)?)
}

fn log_load_outcome(mode: &str, started_at: Instant, result: &StoreResult<Calendar>) {
    match result {
        Ok(calendar) => info!(
            "event=calendar_load module=codec status=ok mode={} duration_ms={} meetings={} next_id={}",
            mode,
            started_at.elapsed().as_millis(),
            calendar.len(),
            calendar.next_id()
        ),
        Err(err) => error!(
            "event=calendar_load module=codec status=error mode={} duration_ms={} error_code={} error={}",
            mode,
            started_at.elapsed().as_millis(),
            error_code(err),
            err
        ),
    }
}

fn error_code(err: &StoreError) -> &'static str {
    match err {
        StoreError::Io(_) => "read_failed",
        StoreError::Decode(_) => "decode_failed",
        StoreError::Restore(_) => "restore_failed",
    }
}
