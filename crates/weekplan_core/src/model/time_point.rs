//! Calendar time point model.
//!
//! # Responsibility
//! - Represent one instant as `(week, day, time_of_day)`.
//! - Reject out-of-range fields at construction time.
//! - Provide the linear coordinate used by conflict detection.
//!
//! # Invariants
//! - `week` is in `1..=50`, `day` is in `1..=7`.
//! - `time_of_day` uses military encoding `hours * 100 + minutes` with
//!   `hours` in `0..=23` and `minutes` in `0..=59`.
//! - Ordering is lexicographic on `(week, day, time_of_day)` and matches the
//!   ordering of [`TimePoint::minute_of_calendar`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Highest week number a calendar can address.
pub const MAX_WEEK: u32 = 50;
/// Days per week; day `1` is Monday.
pub const DAYS_PER_WEEK: u32 = 7;
/// Highest legal military time value.
pub const MAX_TIME_OF_DAY: u32 = 2359;

const MINUTES_PER_DAY: u32 = 24 * 60;
const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// English name of week day `day` (1 = Monday), or `None` outside `1..=7`.
pub fn day_name(day: u32) -> Option<&'static str> {
    let index = usize::try_from(day.checked_sub(1)?).ok()?;
    DAY_NAMES.get(index).copied()
}

static TIME_POINT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^w(\d{1,2})-d(\d)-(\d{1,4})$").expect("valid time point regex")
});

/// Range/parse failure for [`TimePoint`] construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimePointError {
    /// Week outside `1..=50`.
    Week(u32),
    /// Day outside `1..=7`.
    Day(u32),
    /// Time of day outside `0..=2359`.
    Time(u32),
    /// Minutes component (`time % 100`) outside `0..=59`.
    Minutes(u32),
    /// Text does not match `W<week>-D<day>-<HHMM>`.
    Parse(String),
}

impl Display for TimePointError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Week(value) => write!(f, "week {value} out of range 1..={MAX_WEEK}"),
            Self::Day(value) => write!(f, "day {value} out of range 1..={DAYS_PER_WEEK}"),
            Self::Time(value) => {
                write!(f, "time {value} out of range 0..={MAX_TIME_OF_DAY}")
            }
            Self::Minutes(value) => write!(
                f,
                "time {value} has minutes {} out of range 0..=59",
                value % 100
            ),
            Self::Parse(text) => write!(
                f,
                "invalid time point `{text}`; expected W<week>-D<day>-<HHMM>"
            ),
        }
    }
}

impl Error for TimePointError {}

/// Absolute instant on the calendar timeline.
///
/// Field order matters: the derived `Ord` compares `week`, then `day`, then
/// `time_of_day`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimePoint", into = "RawTimePoint")]
pub struct TimePoint {
    week: u32,
    day: u32,
    time_of_day: u32,
}

impl TimePoint {
    /// Builds a validated time point.
    ///
    /// # Errors
    /// - Returns the first out-of-range field, checked in `week`, `day`,
    ///   `time`, `minutes` order.
    pub fn new(week: u32, day: u32, time_of_day: u32) -> Result<Self, TimePointError> {
        if !(1..=MAX_WEEK).contains(&week) {
            return Err(TimePointError::Week(week));
        }
        if !(1..=DAYS_PER_WEEK).contains(&day) {
            return Err(TimePointError::Day(day));
        }
        if time_of_day > MAX_TIME_OF_DAY {
            return Err(TimePointError::Time(time_of_day));
        }
        if time_of_day % 100 > 59 {
            return Err(TimePointError::Minutes(time_of_day));
        }
        Ok(Self {
            week,
            day,
            time_of_day,
        })
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Military time (`hours * 100 + minutes`).
    pub fn time_of_day(&self) -> u32 {
        self.time_of_day
    }

    pub fn hours(&self) -> u32 {
        self.time_of_day / 100
    }

    pub fn minutes(&self) -> u32 {
        self.time_of_day % 100
    }

    /// English day name, Monday for day 1 through Sunday for day 7.
    pub fn day_name(&self) -> &'static str {
        DAY_NAMES[(self.day - 1) as usize]
    }

    /// Minutes elapsed since week 1, day 1, 00:00.
    ///
    /// Strictly monotone in the `Ord` of `TimePoint`, so interval checks can
    /// run on plain integers without day/week boundary cases.
    pub fn minute_of_calendar(&self) -> u32 {
        let day_index = (self.week - 1) * DAYS_PER_WEEK + (self.day - 1);
        day_index * MINUTES_PER_DAY + self.hours() * 60 + self.minutes()
    }
}

impl Display for TimePoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "W{}-D{}-{:04}", self.week, self.day, self.time_of_day)
    }
}

impl FromStr for TimePoint {
    type Err = TimePointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let captures = TIME_POINT_RE
            .captures(trimmed)
            .ok_or_else(|| TimePointError::Parse(trimmed.to_string()))?;
        let field = |index: usize| -> Result<u32, TimePointError> {
            captures[index]
                .parse::<u32>()
                .map_err(|_| TimePointError::Parse(trimmed.to_string()))
        };
        Self::new(field(1)?, field(2)?, field(3)?)
    }
}

/// Wire shape used by serde; converted through [`TimePoint::new`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawTimePoint {
    week: u32,
    day: u32,
    time: u32,
}

impl TryFrom<RawTimePoint> for TimePoint {
    type Error = TimePointError;

    fn try_from(value: RawTimePoint) -> Result<Self, Self::Error> {
        Self::new(value.week, value.day, value.time)
    }
}

impl From<TimePoint> for RawTimePoint {
    fn from(value: TimePoint) -> Self {
        Self {
            week: value.week,
            day: value.day,
            time: value.time_of_day,
        }
    }
}
