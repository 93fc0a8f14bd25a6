//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate model validation, conflict checks and repository writes.
//! - Keep CLI and persistence layers decoupled from storage details.

pub mod calendar;
