//! Calendar domain model.
//!
//! # Responsibility
//! - Define the value types every other layer exchanges.
//! - Validate fields at construction so invalid values cannot exist.
//!
//! # Invariants
//! - A `TimePoint` is always in range.
//! - A `Meeting` always has a non-blank subject and positive duration.

pub mod meeting;
pub mod time_point;
