//! Flat text persistence for calendar snapshots.
//!
//! # Responsibility
//! - Encode/decode calendar snapshots to the versioned flat record format.
//! - Read the legacy five-field record layout.
//! - Save/load whole calendar files.
//!
//! # Invariants
//! - Decoding is all-or-nothing: any malformed record fails the whole input.
//! - Loaded data only becomes calendar state after snapshot validation.
//! - Format version is tracked by the `weekplan v<N>` header line.

use crate::service::calendar::CalendarError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod flat_file;
mod store;

pub use flat_file::{decode, decode_legacy, encode, FORMAT_VERSION};
pub use store::{import_legacy_from_path, load_from_path, load_or_default, save_to_path};

pub type StoreResult<T> = Result<T, StoreError>;

/// What went wrong while decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Input has no content at all.
    Empty,
    /// First line is not `weekplan v<N>`.
    MissingHeader,
    UnsupportedVersion { found: u32, supported: u32 },
    /// Line is not `key=value`.
    MalformedLine(String),
    UnknownKey(String),
    DuplicateKey(String),
    MissingKey(&'static str),
    InvalidValue { key: &'static str, message: String },
    /// Legacy input ends in the middle of a record.
    TruncatedRecord { fields_read: usize },
}

/// Malformed persisted data; `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    pub line: usize,
    pub kind: DecodeErrorKind,
}

impl DecodeError {
    pub(crate) fn new(line: usize, kind: DecodeErrorKind) -> Self {
        Self { line, kind }
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: ", self.line)?;
        match &self.kind {
            DecodeErrorKind::Empty => write!(f, "calendar data is empty"),
            DecodeErrorKind::MissingHeader => {
                write!(f, "missing `weekplan v<N>` header")
            }
            DecodeErrorKind::UnsupportedVersion { found, supported } => write!(
                f,
                "calendar format version {found} is not supported (latest {supported})"
            ),
            DecodeErrorKind::MalformedLine(line) => {
                write!(f, "expected `key=value`, got `{line}`")
            }
            DecodeErrorKind::UnknownKey(key) => write!(f, "unknown key `{key}`"),
            DecodeErrorKind::DuplicateKey(key) => write!(f, "duplicate key `{key}`"),
            DecodeErrorKind::MissingKey(key) => write!(f, "record is missing `{key}`"),
            DecodeErrorKind::InvalidValue { key, message } => {
                write!(f, "invalid `{key}`: {message}")
            }
            DecodeErrorKind::TruncatedRecord { fields_read } => write!(
                f,
                "legacy record truncated after {fields_read} of 5 fields"
            ),
        }
    }
}

impl Error for DecodeError {}

/// Failure while saving or loading a calendar file.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Decode(DecodeError),
    /// Decoded snapshot violates calendar invariants.
    Restore(CalendarError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Decode(err) => write!(f, "{err}"),
            Self::Restore(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Restore(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<DecodeError> for StoreError {
    fn from(value: DecodeError) -> Self {
        Self::Decode(value)
    }
}

impl From<CalendarError> for StoreError {
    fn from(value: CalendarError) -> Self {
        Self::Restore(value)
    }
}
