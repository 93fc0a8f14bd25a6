//! Meeting conflict detection.
//!
//! # Responsibility
//! - Decide whether a candidate span intersects stored meetings.
//! - Report the conflicting meetings so callers can show them.
//!
//! # Invariants
//! - Spans are half-open `[start, end)`; touching spans never conflict.
//! - Comparisons run on the linear `(week, day, time)` order only.

pub mod index;
