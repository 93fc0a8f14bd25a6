//! Versioned flat record codec.
//!
//! Layout (v1):
//!
//! ```text
//! weekplan v1
//! next_id=4
//!
//! id=1
//! subject=Design review
//! priority=critical
//! start=W1-D2-1400
//! end=W1-D2-1530
//! ```
//!
//! Records are separated by blank lines. Inside a record every key appears
//! exactly once, in any order. Values run to the end of the line, so a
//! subject may contain `=`.

use super::{DecodeError, DecodeErrorKind};
use crate::model::meeting::{Meeting, MeetingId, Priority, UNASSIGNED_ID};
use crate::model::time_point::TimePoint;
use crate::service::calendar::{CalendarSnapshot, FIRST_MEETING_ID};
use std::fmt::Write;

/// Latest format version written by [`encode`].
pub const FORMAT_VERSION: u32 = 1;

const HEADER_PREFIX: &str = "weekplan v";
const KEY_NEXT_ID: &str = "next_id";
const RECORD_KEYS: [&str; 5] = ["id", "subject", "priority", "start", "end"];
const LEGACY_FIELDS: usize = 5;

/// Encodes a snapshot; meetings are written in ascending id order.
pub fn encode(snapshot: &CalendarSnapshot) -> String {
    let mut meetings: Vec<&Meeting> = snapshot.meetings.iter().collect();
    meetings.sort_by_key(|meeting| meeting.id());

    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{HEADER_PREFIX}{FORMAT_VERSION}");
    let _ = writeln!(out, "{KEY_NEXT_ID}={}", snapshot.next_id);
    for meeting in meetings {
        let _ = writeln!(out);
        let _ = writeln!(out, "id={}", meeting.id());
        let _ = writeln!(out, "subject={}", meeting.subject());
        let _ = writeln!(out, "priority={}", meeting.priority());
        let _ = writeln!(out, "start={}", meeting.start());
        let _ = writeln!(out, "end={}", meeting.end());
    }
    out
}

/// Decodes text produced by [`encode`].
///
/// # Errors
/// - Returns the first problem found, with its 1-based line number. No
///   partial snapshot is ever returned.
pub fn decode(text: &str) -> Result<CalendarSnapshot, DecodeError> {
    let mut lines = text.lines().enumerate().map(|(index, line)| (index + 1, line));

    let (header_line, header) = lines
        .next()
        .ok_or(DecodeError::new(1, DecodeErrorKind::Empty))?;
    parse_header(header_line, header)?;

    let mut next_id: Option<MeetingId> = None;
    let mut meetings = Vec::new();
    let mut record: Vec<(usize, &str)> = Vec::new();
    let mut in_header = true;

    for (line_no, line) in lines {
        if line.trim().is_empty() {
            if in_header {
                in_header = false;
            } else if !record.is_empty() {
                meetings.push(parse_record(&record)?);
                record.clear();
            }
            continue;
        }
        if in_header {
            let (key, value) = split_key_value(line_no, line)?;
            if key != KEY_NEXT_ID {
                return Err(DecodeError::new(
                    line_no,
                    DecodeErrorKind::UnknownKey(key.to_string()),
                ));
            }
            if next_id.is_some() {
                return Err(DecodeError::new(
                    line_no,
                    DecodeErrorKind::DuplicateKey(key.to_string()),
                ));
            }
            next_id = Some(parse_id(line_no, KEY_NEXT_ID, value)?);
        } else {
            record.push((line_no, line));
        }
    }
    if !record.is_empty() {
        meetings.push(parse_record(&record)?);
    }

    let next_id = next_id.ok_or(DecodeError::new(
        header_line + 1,
        DecodeErrorKind::MissingKey(KEY_NEXT_ID),
    ))?;
    Ok(CalendarSnapshot { next_id, meetings })
}

/// Decodes the legacy layout: whitespace-separated `id subject day
/// startTime endTime` tokens, five per meeting.
///
/// Legacy files carry no week, end day or priority. Meetings are placed in
/// week 1, end on their start day and are non-critical. Legacy ids were
/// zero-based and are shifted up by one.
pub fn decode_legacy(text: &str) -> Result<CalendarSnapshot, DecodeError> {
    let tokens: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .flat_map(|(index, line)| line.split_whitespace().map(move |token| (index + 1, token)))
        .collect();

    let remainder = tokens.len() % LEGACY_FIELDS;
    if remainder != 0 {
        let line = tokens.last().map_or(1, |(line, _)| *line);
        return Err(DecodeError::new(
            line,
            DecodeErrorKind::TruncatedRecord {
                fields_read: remainder,
            },
        ));
    }

    let mut meetings = Vec::with_capacity(tokens.len() / LEGACY_FIELDS);
    for chunk in tokens.chunks(LEGACY_FIELDS) {
        let (id_line, id_text) = chunk[0];
        let legacy_id: MeetingId = parse_number(id_line, "id", id_text)?;
        let id = legacy_id
            .checked_add(1)
            .ok_or_else(|| invalid_value(id_line, "id", "legacy id is too large"))?;
        let (_, subject) = chunk[1];
        let (day_line, day_text) = chunk[2];
        let day: u32 = parse_number(day_line, "day", day_text)?;
        let (start_line, start_text) = chunk[3];
        let start_time: u32 = parse_number(start_line, "startTime", start_text)?;
        let (end_line, end_text) = chunk[4];
        let end_time: u32 = parse_number(end_line, "endTime", end_text)?;

        let start = TimePoint::new(1, day, start_time)
            .map_err(|err| invalid_value(start_line, "startTime", err))?;
        let end = TimePoint::new(1, day, end_time)
            .map_err(|err| invalid_value(end_line, "endTime", err))?;
        let meeting = Meeting::with_id(id, subject, Priority::NonCritical, start, end)
            .map_err(|err| invalid_value(end_line, "endTime", err))?;
        meetings.push(meeting);
    }

    let next_id = match meetings.iter().max_by_key(|meeting| meeting.id()) {
        Some(last) => last.id().checked_add(1).ok_or_else(|| {
            let line = tokens.last().map_or(1, |(line, _)| *line);
            invalid_value(line, "id", "no id left after the highest legacy id")
        })?,
        None => FIRST_MEETING_ID,
    };
    Ok(CalendarSnapshot { next_id, meetings })
}

fn parse_header(line_no: usize, line: &str) -> Result<(), DecodeError> {
    let version_text = line
        .trim()
        .strip_prefix(HEADER_PREFIX)
        .ok_or(DecodeError::new(line_no, DecodeErrorKind::MissingHeader))?;
    let version: u32 = version_text
        .parse()
        .map_err(|_| DecodeError::new(line_no, DecodeErrorKind::MissingHeader))?;
    if version != FORMAT_VERSION {
        return Err(DecodeError::new(
            line_no,
            DecodeErrorKind::UnsupportedVersion {
                found: version,
                supported: FORMAT_VERSION,
            },
        ));
    }
    Ok(())
}

fn parse_record(lines: &[(usize, &str)]) -> Result<Meeting, DecodeError> {
    let mut values: [Option<(usize, &str)>; 5] = [None; 5];
    for &(line_no, line) in lines {
        let (key, value) = split_key_value(line_no, line)?;
        let slot = RECORD_KEYS
            .iter()
            .position(|known| *known == key)
            .ok_or_else(|| {
                DecodeError::new(line_no, DecodeErrorKind::UnknownKey(key.to_string()))
            })?;
        if values[slot].is_some() {
            return Err(DecodeError::new(
                line_no,
                DecodeErrorKind::DuplicateKey(key.to_string()),
            ));
        }
        values[slot] = Some((line_no, value));
    }

    let record_line = lines.first().map_or(1, |(line_no, _)| *line_no);
    let mut field = |index: usize| {
        values[index].take().ok_or(DecodeError::new(
            record_line,
            DecodeErrorKind::MissingKey(RECORD_KEYS[index]),
        ))
    };
    let (id_line, id_text) = field(0)?;
    let (_, subject) = field(1)?;
    let (priority_line, priority_text) = field(2)?;
    let (start_line, start_text) = field(3)?;
    let (end_line, end_text) = field(4)?;

    let id = parse_id(id_line, "id", id_text)?;
    let priority: Priority = priority_text
        .parse()
        .map_err(|err| invalid_value(priority_line, "priority", err))?;
    let start: TimePoint = start_text
        .parse()
        .map_err(|err| invalid_value(start_line, "start", err))?;
    let end: TimePoint = end_text
        .parse()
        .map_err(|err| invalid_value(end_line, "end", err))?;

    Meeting::with_id(id, subject, priority, start, end)
        .map_err(|err| invalid_value(record_line, "subject/start/end", err))
}

fn split_key_value(line_no: usize, line: &str) -> Result<(&str, &str), DecodeError> {
    line.split_once('=')
        .map(|(key, value)| (key.trim(), value))
        .ok_or_else(|| DecodeError::new(line_no, DecodeErrorKind::MalformedLine(line.to_string())))
}

fn parse_id(line_no: usize, key: &'static str, value: &str) -> Result<MeetingId, DecodeError> {
    let id: MeetingId = parse_number(line_no, key, value)?;
    if id == UNASSIGNED_ID {
        return Err(DecodeError::new(
            line_no,
            DecodeErrorKind::InvalidValue {
                key,
                message: "must be greater than zero".to_string(),
            },
        ));
    }
    Ok(id)
}

fn parse_number<T: std::str::FromStr>(
    line_no: usize,
    key: &'static str,
    value: &str,
) -> Result<T, DecodeError> {
    value.trim().parse::<T>().map_err(|_| {
        DecodeError::new(
            line_no,
            DecodeErrorKind::InvalidValue {
                key,
                message: format!("`{}` is not a non-negative integer", value.trim()),
            },
        )
    })
}

fn invalid_value(line_no: usize, key: &'static str, err: impl std::fmt::Display) -> DecodeError {
    DecodeError::new(
        line_no,
        DecodeErrorKind::InvalidValue {
            key,
            message: err.to_string(),
        },
    )
}
